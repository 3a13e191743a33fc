use std::path::Path;

/// Decides whether a directory entry counts as hidden.
///
/// Implementations must not fail: any fault while probing resolves to `false`.
pub trait HiddenProbe: Send + Sync {
    fn is_hidden(&self, path: &Path) -> bool;
}

/// The platform's own notion of hidden entries.
///
/// - Windows: the `FILE_ATTRIBUTE_HIDDEN` attribute.
/// - Unix: a file name starting with `.`.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeHiddenProbe;

impl HiddenProbe for NativeHiddenProbe {
    #[cfg(windows)]
    fn is_hidden(&self, path: &Path) -> bool {
        use std::os::windows::fs::MetadataExt;

        const FILE_ATTRIBUTE_HIDDEN: u32 = 0x2;

        std::fs::symlink_metadata(path)
            .is_ok_and(|meta| meta.file_attributes() & FILE_ATTRIBUTE_HIDDEN != 0)
    }

    #[cfg(unix)]
    fn is_hidden(&self, path: &Path) -> bool {
        path.file_name()
            .is_some_and(|name| name.to_string_lossy().starts_with('.'))
    }

    #[cfg(not(any(windows, unix)))]
    fn is_hidden(&self, _path: &Path) -> bool {
        false
    }
}

/// For platforms (and tests) without a hidden-entry concept.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverHidden;

impl HiddenProbe for NeverHidden {
    fn is_hidden(&self, _path: &Path) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn never_hidden_is_always_false() {
        assert!(!NeverHidden.is_hidden(Path::new("/data/.cache")));
    }

    #[cfg(unix)]
    #[test]
    fn native_probe_treats_dotfiles_as_hidden() {
        assert!(NativeHiddenProbe.is_hidden(Path::new("/data/.cache")));
        assert!(!NativeHiddenProbe.is_hidden(Path::new("/data/cache")));
        assert!(!NativeHiddenProbe.is_hidden(Path::new("/data/.cache/visible.txt")));
    }

    #[cfg(windows)]
    #[test]
    fn native_probe_swallows_missing_files() {
        assert!(!NativeHiddenProbe.is_hidden(Path::new(r"C:\definitely\not\here.txt")));
    }
}

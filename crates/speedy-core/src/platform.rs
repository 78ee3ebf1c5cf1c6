//! Platform specifics: where applications live and how they are named.

use freedesktop_desktop_entry::DesktopEntry;
use std::path::{Path, PathBuf};

/// Directories scanned for installed applications, in priority order.
pub fn application_dirs() -> Vec<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        let mut dirs = vec![PathBuf::from(
            r"C:\ProgramData\Microsoft\Windows\Start Menu\Programs",
        )];
        if let Some(appdata) = std::env::var_os("APPDATA") {
            dirs.push(PathBuf::from(appdata).join(r"Microsoft\Windows\Start Menu\Programs"));
        }
        dirs
    }

    #[cfg(target_os = "macos")]
    {
        let mut dirs = vec![
            PathBuf::from("/Applications"),
            PathBuf::from("/System/Applications"),
        ];
        if let Some(home) = std::env::var_os("HOME") {
            dirs.push(PathBuf::from(home).join("Applications"));
        }
        dirs
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        let mut dirs = Vec::new();

        let data_home = std::env::var_os("XDG_DATA_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".local/share")));
        if let Some(data_home) = data_home {
            dirs.push(data_home.join("applications"));
        }

        let data_dirs = std::env::var("XDG_DATA_DIRS")
            .ok()
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| "/usr/local/share:/usr/share".to_string());
        for dir in data_dirs.split(':') {
            dirs.push(PathBuf::from(dir).join("applications"));
        }
        dirs
    }
}

/// File extension that marks an application entry inside [`application_dirs`].
pub fn application_extension() -> &'static str {
    #[cfg(target_os = "windows")]
    return "lnk";

    #[cfg(target_os = "macos")]
    return "app";

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    "desktop"
}

/// Display name of a freedesktop `.desktop` file.
///
/// Entries that are hidden, marked `NoDisplay`, or are not of type
/// `Application` yield `None`. Localized names are ignored.
pub fn desktop_entry_name(path: &Path, content: &str) -> Option<String> {
    let entry = DesktopEntry::from_str(path, content, Some(&["en"])).ok()?;

    if entry.no_display() || entry.hidden() {
        return None;
    }
    if entry.type_().is_some_and(|t| t != "Application") {
        return None;
    }

    let locales: &[&str] = &[];
    let name = entry.name(locales)?.trim().to_string();
    (!name.is_empty()).then_some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name_of(content: &str) -> Option<String> {
        desktop_entry_name(Path::new("/usr/share/applications/test.desktop"), content)
    }

    #[test]
    fn test_desktop_entry_name() {
        let content = "[Desktop Entry]\nType=Application\nName=Firefox\nExec=firefox %u\n";
        assert_eq!(name_of(content), Some("Firefox".to_string()));
    }

    #[test]
    fn test_desktop_entry_ignores_localized_and_action_groups() {
        let content = "[Desktop Entry]\nType=Application\nName=Files\nName[de]=Dateien\n\n[Desktop Action new]\nName=New Window\n";
        assert_eq!(name_of(content), Some("Files".to_string()));
    }

    #[test]
    fn test_desktop_entry_no_display() {
        let content = "[Desktop Entry]\nType=Application\nName=Helper\nNoDisplay=true\n";
        assert_eq!(name_of(content), None);
    }

    #[test]
    fn test_desktop_entry_hidden() {
        let content = "[Desktop Entry]\nType=Application\nName=Gone\nHidden=true\n";
        assert_eq!(name_of(content), None);
    }

    #[test]
    fn test_desktop_entry_link_type() {
        let content = "[Desktop Entry]\nType=Link\nName=Docs\nURL=https://example.com\n";
        assert_eq!(name_of(content), None);
    }

    #[test]
    fn test_desktop_entry_without_name() {
        let content = "[Desktop Entry]\nType=Application\nExec=true\n";
        assert_eq!(name_of(content), None);
    }

    #[test]
    fn test_application_dirs_not_empty() {
        assert!(!application_dirs().is_empty());
    }
}

//! Operating system detection.
//!
//! Backend selection keys off the distro *family* rather than the exact
//! distro: derivatives report their parent through `ID_LIKE` in
//! `/etc/os-release`, so an EndeavourOS box still routes to pacman.

#[cfg(any(target_os = "windows", target_os = "macos"))]
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OsType {
    Windows,
    Linux { distro: LinuxDistro },
    MacOs,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinuxDistro {
    /// Debian, Ubuntu, Mint, Pop!_OS, ...
    Debian,
    /// Arch, Manjaro, EndeavourOS, ...
    Arch,
    /// Fedora, RHEL, CentOS, Rocky, ...
    Fedora,
    Unknown,
}

#[derive(Debug, Clone)]
pub struct OsContext {
    pub os_type: OsType,
    pub os_name: Option<String>,
    pub os_version: Option<String>,
}

impl OsContext {
    pub fn detect() -> Self {
        #[cfg(target_os = "windows")]
        {
            Self::detect_windows()
        }

        #[cfg(target_os = "linux")]
        {
            Self::detect_linux()
        }

        #[cfg(target_os = "macos")]
        {
            Self::detect_macos()
        }

        #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
        {
            Self {
                os_type: OsType::Unknown,
                os_name: None,
                os_version: None,
            }
        }
    }

    #[cfg(target_os = "windows")]
    fn detect_windows() -> Self {
        let version = Command::new("cmd")
            .args(["/C", "ver"])
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string());
        Self {
            os_type: OsType::Windows,
            os_name: Some("Windows".to_string()),
            os_version: version,
        }
    }

    #[cfg(target_os = "linux")]
    fn detect_linux() -> Self {
        let os_release = std::fs::read_to_string("/etc/os-release").unwrap_or_default();
        let parsed = parse_os_release(&os_release);
        Self {
            os_type: OsType::Linux {
                distro: parsed.distro,
            },
            os_name: parsed.name,
            os_version: parsed.version,
        }
    }

    #[cfg(target_os = "macos")]
    fn detect_macos() -> Self {
        let version = Command::new("sw_vers")
            .arg("-productVersion")
            .output()
            .ok()
            .filter(|o| o.status.success())
            .map(|o| String::from_utf8_lossy(&o.stdout).trim().to_string());
        Self {
            os_type: OsType::MacOs,
            os_name: Some("macOS".to_string()),
            os_version: version,
        }
    }
}

pub(crate) struct ParsedOsRelease {
    pub distro: LinuxDistro,
    pub name: Option<String>,
    pub version: Option<String>,
}

/// Parse the `/etc/os-release` key/value format.
pub(crate) fn parse_os_release(contents: &str) -> ParsedOsRelease {
    let mut id = None;
    let mut id_like = None;
    let mut name = None;
    let mut version = None;

    for line in contents.lines() {
        if let Some((key, value)) = line.split_once('=') {
            let value = value.trim_matches('"');
            match key {
                "ID" => id = Some(value.to_lowercase()),
                "ID_LIKE" => id_like = Some(value.to_lowercase()),
                "NAME" => name = Some(value.to_string()),
                "VERSION_ID" => version = Some(value.to_string()),
                _ => {}
            }
        }
    }

    let distro = match id.as_deref() {
        Some("debian" | "ubuntu" | "linuxmint" | "pop") => LinuxDistro::Debian,
        Some("arch" | "manjaro" | "endeavouros") => LinuxDistro::Arch,
        Some("fedora" | "rhel" | "centos" | "rocky") => LinuxDistro::Fedora,
        _ => match id_like.as_deref() {
            Some(like) if like.contains("debian") || like.contains("ubuntu") => LinuxDistro::Debian,
            Some(like) if like.contains("arch") => LinuxDistro::Arch,
            Some(like) if like.contains("fedora") || like.contains("rhel") => LinuxDistro::Fedora,
            _ => LinuxDistro::Unknown,
        },
    };

    ParsedOsRelease {
        distro,
        name,
        version,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn ubuntu_maps_to_debian_family() {
        let parsed = parse_os_release(
            "NAME=\"Ubuntu\"\nID=ubuntu\nID_LIKE=debian\nVERSION_ID=\"24.04\"\n",
        );
        assert_eq!(parsed.distro, LinuxDistro::Debian);
        assert_eq!(parsed.name.as_deref(), Some("Ubuntu"));
        assert_eq!(parsed.version.as_deref(), Some("24.04"));
    }

    #[test]
    fn derivative_falls_back_to_id_like() {
        let parsed = parse_os_release("ID=garuda\nID_LIKE=arch\n");
        assert_eq!(parsed.distro, LinuxDistro::Arch);
    }

    #[test]
    fn unknown_distro_without_id_like() {
        let parsed = parse_os_release("ID=nixos\n");
        assert_eq!(parsed.distro, LinuxDistro::Unknown);
    }

    #[test]
    fn os_detection_matches_build_target() {
        let context = OsContext::detect();

        #[cfg(target_os = "windows")]
        assert_eq!(context.os_type, OsType::Windows);

        #[cfg(target_os = "macos")]
        assert_eq!(context.os_type, OsType::MacOs);

        #[cfg(target_os = "linux")]
        assert!(matches!(context.os_type, OsType::Linux { .. }));
    }
}

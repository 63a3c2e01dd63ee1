//! OS family / version extraction from raw platform strings.

use crate::storage::models::BackendPlatform;

/// Generic or truncated distro-name prefixes resolved to product names.
/// An explicit lookup — extend here, never infer.
const DISTRO_CANONICAL: [(&str, &str); 5] = [
    ("Debian", "Debian GNU"),
    ("Red", "Red Hat"),
    ("RHEL", "Red Hat"),
    ("Trisquel", "Trisquel GNU"),
    ("Linux", "Linux Mint"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OsInfo {
    pub family: String,
    pub version: Option<String>,
}

/// Derive the OS family label and short version string for a session.
///
/// macOS keeps only the major version token; everything else keeps the raw
/// version string unchanged and takes its family from the first whitespace
/// token of the distro string, canonicalized. The asymmetry is inherited
/// behavior, reproduced as-is pending product-owner review.
pub fn derive_os(
    platform: &BackendPlatform,
    raw_version: Option<&str>,
    raw_distro: Option<&str>,
) -> OsInfo {
    if *platform == BackendPlatform::MacOs {
        return OsInfo {
            family: "macOS".to_string(),
            version: raw_version.map(major_version),
        };
    }

    let family = match raw_distro.and_then(|d| d.split_whitespace().next()) {
        Some(token) => canonicalize_distro(token).to_string(),
        // No distro reported: fall back to the platform label itself.
        None => String::from(platform.clone()),
    };

    OsInfo {
        family,
        version: raw_version.map(str::to_string),
    }
}

fn major_version(version: &str) -> String {
    version.split('.').next().unwrap_or(version).to_string()
}

fn canonicalize_distro(token: &str) -> &str {
    DISTRO_CANONICAL
        .iter()
        .find(|(raw, _)| *raw == token)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macos_major_version_only() {
        let os = derive_os(&BackendPlatform::MacOs, Some("13.4.1"), None);
        assert_eq!(os.family, "macOS");
        assert_eq!(os.version.as_deref(), Some("13"));
    }

    #[test]
    fn test_linux_version_kept_raw() {
        let os = derive_os(
            &BackendPlatform::Linux,
            Some("5.15.0-86-generic"),
            Some("Ubuntu 22.04.3 LTS"),
        );
        assert_eq!(os.family, "Ubuntu");
        assert_eq!(os.version.as_deref(), Some("5.15.0-86-generic"));
    }

    #[test]
    fn test_debian_canonicalized() {
        let os = derive_os(
            &BackendPlatform::Linux,
            Some("11"),
            Some("Debian GNU/Linux 11"),
        );
        assert_eq!(os.family, "Debian GNU");
        assert_eq!(os.version.as_deref(), Some("11"));
    }

    #[test]
    fn test_red_hat_spellings() {
        for distro in ["Red Hat Enterprise Linux 9", "RHEL 8.6"] {
            let os = derive_os(&BackendPlatform::Linux, None, Some(distro));
            assert_eq!(os.family, "Red Hat", "distro: {}", distro);
        }
    }

    #[test]
    fn test_linux_mint_and_trisquel() {
        let mint = derive_os(&BackendPlatform::Linux, None, Some("Linux Mint 21"));
        assert_eq!(mint.family, "Linux Mint");
        let trisquel = derive_os(&BackendPlatform::Linux, None, Some("Trisquel 10"));
        assert_eq!(trisquel.family, "Trisquel GNU");
    }

    #[test]
    fn test_unmapped_distro_passes_through() {
        let os = derive_os(&BackendPlatform::Linux, None, Some("Fedora Linux 38"));
        assert_eq!(os.family, "Fedora");
    }

    #[test]
    fn test_missing_distro_falls_back_to_platform() {
        let os = derive_os(&BackendPlatform::Windows, Some("10.0.19045"), None);
        assert_eq!(os.family, "Windows");
        assert_eq!(os.version.as_deref(), Some("10.0.19045"));
    }
}

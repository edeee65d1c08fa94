use shared::ImageExtension;
use std::str::FromStr;

/// True when the text after the last `.` is one of the accepted image extensions.
pub fn is_allowed(filename: &str) -> bool {
    match filename.rsplit_once('.') {
        Some((_, extension)) => ImageExtension::from_str(extension).is_ok(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_known_extensions_in_any_case() {
        for name in [
            "scan.png",
            "scan.PNG",
            "scan.jpg",
            "scan.Jpg",
            "scan.jpeg",
            "scan.JPEG",
            "scan.dcm",
            "scan.DcM",
            "archive.tar.png",
            ".png",
        ] {
            assert!(is_allowed(name), "{name} should be allowed");
        }
    }

    #[test]
    fn rejects_everything_else() {
        for name in [
            "",
            "png",
            "scan.",
            "scan.gif",
            "scan.png.exe",
            "scan.pngx",
            "scan. png",
            "../etc/passwd",
        ] {
            assert!(!is_allowed(name), "{name} should be rejected");
        }
    }
}

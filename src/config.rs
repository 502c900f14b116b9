#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:8000"  // Django dev server when running locally
}

#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""  // Same origin in production
}

/// Absolute URL for a backend path such as `/contact/submit/`.
pub fn endpoint(path: &str) -> String {
    format!("{}{}", get_backend_url(), path)
}

/// Element the app renders into; provided by the host template.
pub const MOUNT_SELECTOR: &str = "#landing-root";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_prefixes_backend_url() {
        let url = endpoint("/lead/capture/");
        assert!(url.ends_with("/lead/capture/"));
        assert!(url.starts_with(get_backend_url()));
    }
}

use super::{DEFAULT_PAGE_SIZE, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn page_size() -> u64 {
        DEFAULT_PAGE_SIZE
    }

    // No passwd-style database to consult here.
    fn user_name(_uid: u32) -> Option<String> {
        None
    }
}

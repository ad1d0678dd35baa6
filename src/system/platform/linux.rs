use std::sync::OnceLock;

use super::{DEFAULT_PAGE_SIZE, PlatformExtensions};

pub struct Platform;

impl PlatformExtensions for Platform {
    fn page_size() -> u64 {
        static PAGE_SIZE: OnceLock<u64> = OnceLock::new();
        *PAGE_SIZE.get_or_init(|| {
            // SAFETY: sysconf has no preconditions and only reads a constant.
            let raw = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
            if raw > 0 {
                raw as u64
            } else {
                DEFAULT_PAGE_SIZE
            }
        })
    }

    fn user_name(uid: u32) -> Option<String> {
        users::get_user_by_uid(uid).map(|user| user.name().to_string_lossy().into_owned())
    }
}

pub trait PlatformExtensions {
    fn page_size() -> u64;
    fn user_name(uid: u32) -> Option<String>;
}

#[cfg(target_os = "linux")]
mod linux;
#[cfg(not(target_os = "linux"))]
mod fallback;

#[cfg(target_os = "linux")]
use linux as platform_impl;
#[cfg(not(target_os = "linux"))]
use fallback as platform_impl;

/// Used when the OS does not report a page size.
pub const DEFAULT_PAGE_SIZE: u64 = 4096;

pub fn page_size() -> u64 {
    platform_impl::Platform::page_size()
}

pub fn user_name(uid: u32) -> Option<String> {
    platform_impl::Platform::user_name(uid)
}

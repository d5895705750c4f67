//! Kernel identity via the `uname(2)` syscall.

/// Kernel identification fields as reported by `uname(2)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnameInfo {
    pub sysname: String,
    pub nodename: String,
    pub release: String,
    pub version: String,
    pub machine: String,
}

impl UnameInfo {
    /// Queries the running kernel. Returns `None` when the syscall fails
    /// or the platform has no `uname`.
    #[cfg(unix)]
    pub fn capture() -> Option<Self> {
        let mut raw: libc::utsname = unsafe { std::mem::zeroed() };
        if unsafe { libc::uname(&mut raw) } != 0 {
            return None;
        }

        fn field(buf: &[libc::c_char]) -> String {
            unsafe { std::ffi::CStr::from_ptr(buf.as_ptr()) }
                .to_string_lossy()
                .into_owned()
        }

        Some(Self {
            sysname: field(&raw.sysname),
            nodename: field(&raw.nodename),
            release: field(&raw.release),
            version: field(&raw.version),
            machine: field(&raw.machine),
        })
    }

    #[cfg(not(unix))]
    pub fn capture() -> Option<Self> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_capture_returns_nonempty_fields() {
        let info = UnameInfo::capture().unwrap();
        assert!(!info.sysname.is_empty());
        assert!(!info.release.is_empty());
        assert!(!info.machine.is_empty());
    }
}

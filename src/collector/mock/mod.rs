//! In-memory mock filesystem for testing scrapers without real `/proc`.
//!
//! `MockFs` stores file contents in memory, allowing tests to simulate
//! various `/proc` states (including absent files) without Linux access.

use crate::collector::traits::FileSystem;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    /// Map from path to file contents.
    files: HashMap<PathBuf, String>,
}

impl MockFs {
    /// Creates a new empty mock filesystem.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        self.files.insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Builds a representative `/proc` tree covering every kernel source
    /// the exporter scrapes.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();
        fs.add_file(
            "/proc/stat",
            "cpu  10000 500 3000 80000 1000 200 100 0 0 0\n\
             cpu0 2500 125 750 20000 250 50 25 0 0 0\n\
             cpu1 2500 125 750 20000 250 50 25 0 0 0\n\
             intr 31\n\
             ctxt 500000\n\
             btime 1700000000\n\
             processes 10000\n\
             procs_running 2\n\
             procs_blocked 0\n",
        );
        fs.add_file("/proc/loadavg", "0.10 0.20 0.30 1/200 1234\n");
        fs.add_file(
            "/proc/meminfo",
            "MemTotal:       16384000 kB\n\
             MemFree:         8192000 kB\n\
             VmallocTotal:   34359738367 kB\n\
             HugePages_Total:       0\n\
             Hugepagesize:       2048 kB\n\
             Active(anon):     204800 kB\n",
        );
        fs.add_file("/proc/sys/fs/file-nr", "1344\t0\t9223372036854775807\n");
        fs.add_file(
            "/proc/net/netstat",
            "TcpExt: SyncookiesSent SyncookiesRecv ListenDrops\n\
             TcpExt: 1 2 3\n\
             IpExt: InNoRoutes InTruncatedPkts\n\
             IpExt: 0 4\n",
        );
        fs.add_file(
            "/proc/net/snmp",
            "Ip: Forwarding DefaultTTL InReceives\n\
             Ip: 1 64 1000\n\
             Icmp: InMsgs InErrors\n\
             Icmp: 10 0\n\
             IcmpMsg: InType3 OutType3\n\
             IcmpMsg: 7 8\n\
             Tcp: ActiveOpens PassiveOpens\n\
             Tcp: 50 60\n\
             Udp: InDatagrams NoPorts\n\
             Udp: 70 5\n",
        );
        fs.add_file(
            "/proc/net/dev",
            "Inter-|   Receive                                                |  Transmit\n \
             face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed\n    \
             lo: 1234567     1234    0    0    0     0          0         0  1234567     1234    0    0    0     0       0          0\n  \
             eth0: 9876543     5678    1    2    0     0          0        10 87654321     4321    3    4    0     0       0          0\n",
        );
        fs
    }
}

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("{:?}", path)))
    }
}

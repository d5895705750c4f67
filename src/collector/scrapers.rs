//! Per-source scrapers: one function per kernel pseudo-file.
//!
//! Each scraper reads its source through `read_or_empty`, parses it with
//! the matching `procfs::parser` function and streams metric families into
//! the exposition writer. An absent or empty source yields zero samples; a
//! malformed line never aborts the remaining sources.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::collector::procfs::parser::{
    parse_file_nr, parse_loadavg, parse_meminfo, parse_net_dev, parse_proto_stats, parse_stat,
};
use crate::collector::traits::{FileSystem, read_or_empty};
use crate::collector::uname::UnameInfo;
use crate::exposition::{Exposition, MetricType};

/// Assumed kernel clock tick rate for jiffy-to-second conversion.
const TICKS_PER_SECOND: f64 = 100.0;

/// Per-CPU jiffy columns of `/proc/stat`, in source order.
const CPU_MODES: [&str; 10] = [
    "user", "nice", "system", "idle", "iowait", "irq", "softirq", "steal", "guest", "guest_nice",
];

/// Protocol blocks recognized in `/proc/net/netstat` + `/proc/net/snmp`.
/// A block absent from the source is silently skipped.
const PROTO_BLOCKS: [&str; 8] = [
    "IcmpMsg", "Icmp", "IpExt", "Ip", "TcpExt", "Tcp", "UdpLite", "Udp",
];

/// Per-interface counter columns of `/proc/net/dev`, in source order.
const NET_DEV_FIELDS: [&str; 16] = [
    "receive_bytes",
    "receive_packets",
    "receive_errs",
    "receive_drop",
    "receive_fifo",
    "receive_frame",
    "receive_compressed",
    "receive_multicast",
    "transmit_bytes",
    "transmit_packets",
    "transmit_errs",
    "transmit_drop",
    "transmit_fifo",
    "transmit_colls",
    "transmit_carrier",
    "transmit_compressed",
];

fn emit_scalar(out: &mut Exposition, name: &str, kind: MetricType, value: &Option<String>) {
    if let Some(value) = value {
        out.begin_family(name, kind);
        out.emit(&[], value);
    }
}

/// Scrapes `/proc/stat`: boot time, context switches, interrupts, forks,
/// run-queue gauges and per-CPU mode counters.
pub fn cpu<F: FileSystem>(fs: &F, proc_path: &str, out: &mut Exposition) {
    let info = parse_stat(&read_or_empty(fs, format!("{}/stat", proc_path)));

    emit_scalar(out, "node_boot_time", MetricType::Gauge, &info.btime);
    emit_scalar(out, "node_context_switches", MetricType::Counter, &info.ctxt);
    emit_scalar(out, "node_intr", MetricType::Counter, &info.intr);
    emit_scalar(out, "node_forks", MetricType::Counter, &info.processes);
    emit_scalar(out, "node_procs_running", MetricType::Gauge, &info.procs_running);
    emit_scalar(out, "node_procs_blocked", MetricType::Gauge, &info.procs_blocked);

    if info.cpus.is_empty() {
        return;
    }

    out.begin_family("node_cpu", MetricType::Counter);
    // CPU count is discovered by probing sequential indices until one is
    // absent; there is no other source for it.
    for index in 0u32.. {
        let Some(jiffies) = info.cpus.get(&index) else {
            break;
        };
        let cpu_label = format!("cpu{}", index);
        for (jiffies, mode) in jiffies.iter().zip(CPU_MODES.iter()) {
            let seconds = *jiffies as f64 / TICKS_PER_SECOND;
            out.emit(&[("cpu", &cpu_label), ("mode", mode)], &seconds.to_string());
        }
    }
}

/// Scrapes `/proc/loadavg` into the three load gauges.
pub fn load_averages<F: FileSystem>(fs: &F, proc_path: &str, out: &mut Exposition) {
    let Some(load) = parse_loadavg(&read_or_empty(fs, format!("{}/loadavg", proc_path))) else {
        return;
    };

    out.begin_family("node_load1", MetricType::Gauge);
    out.emit(&[], &load.load1);
    out.begin_family("node_load5", MetricType::Gauge);
    out.emit(&[], &load.load5);
    out.begin_family("node_load15", MetricType::Gauge);
    out.emit(&[], &load.load15);
}

/// Scrapes `/proc/meminfo` into one `node_memory_<name>` gauge per line.
pub fn memory<F: FileSystem>(fs: &F, proc_path: &str, out: &mut Exposition) {
    for entry in parse_meminfo(&read_or_empty(fs, format!("{}/meminfo", proc_path))) {
        out.begin_family(&format!("node_memory_{}", entry.name), MetricType::Gauge);
        out.emit(&[], &entry.value);
    }
}

/// Scrapes `/proc/sys/fs/file-nr` into the file-handle gauges.
pub fn file_handles<F: FileSystem>(fs: &F, proc_path: &str, out: &mut Exposition) {
    let Some(nr) = parse_file_nr(&read_or_empty(fs, format!("{}/sys/fs/file-nr", proc_path)))
    else {
        return;
    };

    out.begin_family("node_filefd_allocated", MetricType::Gauge);
    out.emit(&[], &nr.allocated);
    out.begin_family("node_filefd_maximum", MetricType::Gauge);
    out.emit(&[], &nr.maximum);
}

/// Scrapes `/proc/net/netstat` + `/proc/net/snmp` protocol counters into
/// `node_netstat_<Block>_<Field>` gauges.
pub fn network<F: FileSystem>(fs: &F, proc_path: &str, out: &mut Exposition) {
    let mut content = read_or_empty(fs, format!("{}/net/netstat", proc_path));
    content.push_str(&read_or_empty(fs, format!("{}/net/snmp", proc_path)));
    let blocks = parse_proto_stats(&content);

    for block in PROTO_BLOCKS {
        let Some(pairs) = blocks.get(block) else {
            continue;
        };
        for (field, value) in pairs {
            out.begin_family(&format!("node_netstat_{}_{}", block, field), MetricType::Gauge);
            out.emit(&[], value);
        }
    }
}

/// Scrapes `/proc/net/dev` into one `node_network_<field>` gauge family
/// per counter column, with one sample per interface.
pub fn network_devices<F: FileSystem>(fs: &F, proc_path: &str, out: &mut Exposition) {
    let devices = parse_net_dev(&read_or_empty(fs, format!("{}/net/dev", proc_path)));
    if devices.is_empty() {
        return;
    }

    for (index, field) in NET_DEV_FIELDS.iter().enumerate() {
        out.begin_family(&format!("node_network_{}", field), MetricType::Gauge);
        for device in &devices {
            out.emit(&[("device", &device.name)], &device.fields[index]);
        }
    }
}

/// Emits wall-clock seconds since the epoch, read at scrape time.
pub fn time(out: &mut Exposition) {
    let Ok(now) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return;
    };

    out.begin_family("node_time", MetricType::Counter);
    out.emit(&[], &now.as_secs().to_string());
}

/// Emits the `node_uname_info` gauge from the provided kernel identity.
pub fn uname(info: Option<UnameInfo>, out: &mut Exposition) {
    let Some(info) = info else {
        return;
    };

    out.begin_family("node_uname_info", MetricType::Gauge);
    out.emit(
        &[
            ("sysname", &info.sysname),
            ("nodename", &info.nodename),
            ("release", &info.release),
            ("version", &info.version),
            ("machine", &info.machine),
            ("domainname", "(none)"),
        ],
        "1",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    fn render<S>(scrape: S) -> String
    where
        S: FnOnce(&mut Exposition),
    {
        let mut out = Exposition::new();
        scrape(&mut out);
        out.into_string()
    }

    #[test]
    fn test_cpu_jiffies_divided_by_tick_rate() {
        let fs = MockFs::typical_system();
        let text = render(|out| cpu(&fs, "/proc", out));

        // 20000 idle jiffies on cpu0 -> 200 seconds.
        assert!(text.contains("node_cpu{cpu=\"cpu0\",mode=\"idle\"} 200\n"));
        assert!(text.contains("node_cpu{cpu=\"cpu0\",mode=\"user\"} 25\n"));
        assert!(text.contains("node_cpu{cpu=\"cpu1\",mode=\"nice\"} 1.25\n"));
    }

    #[test]
    fn test_cpu_sample_count_is_cpus_times_modes() {
        let fs = MockFs::typical_system();
        let text = render(|out| cpu(&fs, "/proc", out));

        let samples = text.lines().filter(|l| l.starts_with("node_cpu{")).count();
        assert_eq!(samples, 2 * 10);
    }

    #[test]
    fn test_cpu_discovery_stops_at_gap() {
        let mut fs = MockFs::new();
        // cpu2 present but cpu1 missing: discovery stops after cpu0.
        fs.add_file(
            "/proc/stat",
            "cpu0 1 2 3 4 5 6 7 8 9 10\ncpu2 1 2 3 4 5 6 7 8 9 10\n",
        );
        let text = render(|out| cpu(&fs, "/proc", out));

        assert!(text.contains("cpu=\"cpu0\""));
        assert!(!text.contains("cpu=\"cpu2\""));
    }

    #[test]
    fn test_cpu_scalar_counters() {
        let fs = MockFs::typical_system();
        let text = render(|out| cpu(&fs, "/proc", out));

        assert!(text.contains("# TYPE node_boot_time gauge\nnode_boot_time 1700000000\n"));
        assert!(text.contains("# TYPE node_context_switches counter\nnode_context_switches 500000\n"));
        assert!(text.contains("# TYPE node_forks counter\nnode_forks 10000\n"));
        assert!(text.contains("node_procs_running 2\n"));
    }

    #[test]
    fn test_load_averages_verbatim() {
        let fs = MockFs::typical_system();
        let text = render(|out| load_averages(&fs, "/proc", out));

        assert!(text.contains("# TYPE node_load1 gauge\nnode_load1 0.10\n"));
        assert!(text.contains("# TYPE node_load5 gauge\nnode_load5 0.20\n"));
        assert!(text.contains("# TYPE node_load15 gauge\nnode_load15 0.30\n"));
    }

    #[test]
    fn test_memory_unit_conversion() {
        let fs = MockFs::typical_system();
        let text = render(|out| memory(&fs, "/proc", out));

        assert!(text.contains("node_memory_MemTotal 16777216000\n"));
        assert!(text.contains("node_memory_HugePages_Total 0\n"));
        assert!(text.contains("node_memory_Active_anon 209715200\n"));
    }

    #[test]
    fn test_file_handles() {
        let fs = MockFs::typical_system();
        let text = render(|out| file_handles(&fs, "/proc", out));

        assert!(text.contains("node_filefd_allocated 1344\n"));
        assert!(text.contains("node_filefd_maximum 9223372036854775807\n"));
    }

    #[test]
    fn test_network_merges_netstat_and_snmp() {
        let fs = MockFs::typical_system();
        let text = render(|out| network(&fs, "/proc", out));

        assert!(text.contains("node_netstat_TcpExt_ListenDrops 3\n"));
        assert!(text.contains("node_netstat_Ip_Forwarding 1\n"));
        assert!(text.contains("node_netstat_IcmpMsg_InType3 7\n"));
        assert!(text.contains("node_netstat_Udp_NoPorts 5\n"));
    }

    #[test]
    fn test_network_absent_sources_emit_nothing() {
        let fs = MockFs::new();
        let text = render(|out| network(&fs, "/proc", out));
        assert!(text.is_empty());
    }

    #[test]
    fn test_network_devices_one_sample_per_device() {
        let fs = MockFs::typical_system();
        let text = render(|out| network_devices(&fs, "/proc", out));

        assert!(text.contains("node_network_receive_bytes{device=\"lo\"} 1234567\n"));
        assert!(text.contains("node_network_receive_bytes{device=\"eth0\"} 9876543\n"));
        assert!(text.contains("node_network_transmit_bytes{device=\"eth0\"} 87654321\n"));
        assert!(text.contains("node_network_transmit_compressed{device=\"lo\"} 0\n"));

        let rx_samples = text
            .lines()
            .filter(|l| l.starts_with("node_network_receive_bytes{"))
            .count();
        assert_eq!(rx_samples, 2);
    }

    #[test]
    fn test_time_is_epoch_seconds() {
        let text = render(time);
        let value: u64 = text
            .lines()
            .find(|l| l.starts_with("node_time "))
            .and_then(|l| l.split_whitespace().nth(1))
            .and_then(|v| v.parse().ok())
            .unwrap();
        assert!(value > 1_700_000_000);
    }

    #[test]
    fn test_uname_labels() {
        let info = UnameInfo {
            sysname: "Linux".into(),
            nodename: "host1".into(),
            release: "6.8.0".into(),
            version: "#1 SMP PREEMPT_DYNAMIC Mon Jan 1 00:00:00 UTC 2024".into(),
            machine: "x86_64".into(),
        };
        let text = render(|out| uname(Some(info), out));

        assert!(text.starts_with("# TYPE node_uname_info gauge\n"));
        assert!(text.contains("sysname=\"Linux\""));
        assert!(text.contains("version=\"#1 SMP PREEMPT_DYNAMIC Mon Jan 1 00:00:00 UTC 2024\""));
        assert!(text.contains("domainname=\"(none)\""));
        assert!(text.trim_end().ends_with("} 1"));
    }

    #[test]
    fn test_uname_absent_emits_nothing() {
        let text = render(|out| uname(None, out));
        assert!(text.is_empty());
    }
}

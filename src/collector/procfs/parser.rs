//! Parsers for `/proc` filesystem files.
//!
//! These are pure functions that parse the content of various `/proc`
//! files into structured records. They are designed to be easily testable
//! with string inputs. Numeric tokens that feed the exposition verbatim
//! are kept as strings; only values that need a unit conversion (jiffies,
//! kilobytes) are parsed into integers.

use std::collections::HashMap;

/// Splits text on runs of whitespace, discarding empties.
pub fn whitespace_tokens(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}

/// Splits text on newlines, discarding empty lines.
pub fn nonempty_lines(text: &str) -> Vec<&str> {
    text.lines().filter(|l| !l.trim().is_empty()).collect()
}

/// Parsed data from `/proc/stat`.
///
/// Scalar fields keep the raw token so the exposition renders it verbatim;
/// a field absent from the source stays `None` and its metric is skipped.
#[derive(Debug, Clone, Default)]
pub struct StatInfo {
    pub btime: Option<String>,
    pub ctxt: Option<String>,
    pub intr: Option<String>,
    pub processes: Option<String>,
    pub procs_running: Option<String>,
    pub procs_blocked: Option<String>,
    /// Per-CPU jiffy counts keyed by CPU index, at most 10 per CPU, in the
    /// fixed order user, nice, system, idle, iowait, irq, softirq, steal,
    /// guest, guest_nice.
    pub cpus: HashMap<u32, Vec<u64>>,
}

/// Parses `/proc/stat` content.
///
/// The aggregate `cpu` line is ignored; only indexed `cpuN` lines are
/// collected. Malformed jiffy tokens read as zero.
pub fn parse_stat(content: &str) -> StatInfo {
    let mut info = StatInfo::default();

    for line in content.lines() {
        let parts = whitespace_tokens(line);
        if parts.len() < 2 {
            continue;
        }

        match parts[0] {
            "btime" => info.btime = Some(parts[1].to_string()),
            "ctxt" => info.ctxt = Some(parts[1].to_string()),
            "intr" => info.intr = Some(parts[1].to_string()),
            "processes" => info.processes = Some(parts[1].to_string()),
            "procs_running" => info.procs_running = Some(parts[1].to_string()),
            "procs_blocked" => info.procs_blocked = Some(parts[1].to_string()),
            tag if tag.starts_with("cpu") && tag != "cpu" => {
                let Some(id) = tag.strip_prefix("cpu").and_then(|s| s.parse().ok()) else {
                    continue;
                };
                let jiffies: Vec<u64> = parts[1..]
                    .iter()
                    .take(10)
                    .map(|s| s.parse().unwrap_or(0))
                    .collect();
                info.cpus.insert(id, jiffies);
            }
            _ => {}
        }
    }

    info
}

/// Parsed data from `/proc/loadavg`, tokens kept verbatim.
#[derive(Debug, Clone, Default)]
pub struct LoadAvg {
    pub load1: String,
    pub load5: String,
    pub load15: String,
}

/// Parses `/proc/loadavg` content (first three whitespace tokens).
///
/// Returns `None` when fewer than three tokens are present.
pub fn parse_loadavg(content: &str) -> Option<LoadAvg> {
    let parts = whitespace_tokens(content);
    if parts.len() < 3 {
        return None;
    }

    Some(LoadAvg {
        load1: parts[0].to_string(),
        load5: parts[1].to_string(),
        load15: parts[2].to_string(),
    })
}

/// One normalized line of `/proc/meminfo`.
#[derive(Debug, Clone, PartialEq)]
pub struct MemEntry {
    /// Field name with `)`/`:` stripped and `(` replaced by `_`, so
    /// parenthesized sub-names become part of the metric name.
    pub name: String,
    /// Value in bytes when the source carried a `kB` unit, otherwise the
    /// raw numeric token verbatim.
    pub value: String,
}

/// Parses `/proc/meminfo` content.
///
/// Lines that do not carry a numeric size are skipped; sibling lines are
/// still processed.
pub fn parse_meminfo(content: &str) -> Vec<MemEntry> {
    let mut entries = Vec::new();

    for line in content.lines() {
        let line: String = line
            .chars()
            .filter(|c| *c != ')' && *c != ':')
            .map(|c| if c == '(' { '_' } else { c })
            .collect();
        let parts = whitespace_tokens(&line);
        if parts.len() < 2 {
            continue;
        }

        let name = parts[0].to_string();
        let Ok(size) = parts[1].parse::<u64>() else {
            continue;
        };

        let value = if parts.get(2) == Some(&"kB") {
            (size * 1024).to_string()
        } else {
            parts[1].to_string()
        };

        entries.push(MemEntry { name, value });
    }

    entries
}

/// Parsed data from `/proc/sys/fs/file-nr`, tokens kept verbatim.
///
/// The middle token (freed-but-unallocated handles) is always zero on
/// Linux and is ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FileNr {
    pub allocated: String,
    pub maximum: String,
}

/// Parses `/proc/sys/fs/file-nr` content (first and third tokens).
pub fn parse_file_nr(content: &str) -> Option<FileNr> {
    let parts = whitespace_tokens(content);
    if parts.len() < 3 {
        return None;
    }

    Some(FileNr {
        allocated: parts[0].to_string(),
        maximum: parts[2].to_string(),
    })
}

/// Parses `/proc/net/netstat` / `/proc/net/snmp` style protocol blocks.
///
/// Each protocol has two lines sharing a `Block:` first token; the first
/// carries field names, the second numeric values:
///
/// ```text
/// Tcp: ActiveOpens PassiveOpens ...
/// Tcp: 50 60 ...
/// ```
///
/// Field name *i* pairs with value *i* positionally; a trailing field with
/// no matching value is dropped. Returns block name (without the colon)
/// mapped to its (field, value) pairs.
pub fn parse_proto_stats(content: &str) -> HashMap<String, Vec<(String, String)>> {
    let mut blocks = HashMap::new();
    let lines = nonempty_lines(content);

    let mut i = 0;
    while i + 1 < lines.len() {
        let key_parts = whitespace_tokens(lines[i]);
        let val_parts = whitespace_tokens(lines[i + 1]);

        if key_parts.is_empty() || val_parts.is_empty() || key_parts[0] != val_parts[0] {
            i += 1;
            continue;
        }

        let block = key_parts[0].trim_end_matches(':').to_string();
        let pairs: Vec<(String, String)> = key_parts[1..]
            .iter()
            .zip(val_parts[1..].iter())
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        blocks.insert(block, pairs);
        i += 2;
    }

    blocks
}

/// One device line of `/proc/net/dev`, counters kept verbatim.
#[derive(Debug, Clone, Default)]
pub struct NetDevice {
    /// Interface name (lo, eth0, ...).
    pub name: String,
    /// The 16 numeric fields: receive bytes/packets/errs/drop/fifo/frame/
    /// compressed/multicast then transmit bytes/packets/errs/drop/fifo/
    /// colls/carrier/compressed.
    pub fields: Vec<String>,
}

/// Parses `/proc/net/dev` content.
///
/// The two header lines (containing `|`) are skipped, as is any line with
/// fewer than 16 counters.
pub fn parse_net_dev(content: &str) -> Vec<NetDevice> {
    let mut devices = Vec::new();

    for line in content.lines() {
        if line.contains('|') || line.trim().is_empty() {
            continue;
        }

        let Some((name, counters)) = line.split_once(':') else {
            continue;
        };

        let fields: Vec<String> = whitespace_tokens(counters)
            .iter()
            .take(16)
            .map(|s| s.to_string())
            .collect();
        if fields.len() < 16 {
            continue;
        }

        devices.push(NetDevice {
            name: name.trim().to_string(),
            fields,
        });
    }

    devices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_tokens() {
        assert_eq!(whitespace_tokens("  a \t b\nc  "), vec!["a", "b", "c"]);
        assert!(whitespace_tokens("").is_empty());
        assert!(whitespace_tokens("   \n\t ").is_empty());
    }

    #[test]
    fn test_nonempty_lines() {
        assert_eq!(nonempty_lines("a\n\nb\n \nc"), vec!["a", "b", "c"]);
        assert!(nonempty_lines("").is_empty());
    }

    #[test]
    fn test_parse_stat() {
        let content = "\
cpu  10000 500 3000 80000 1000 200 100 0 0 0
cpu0 2500 125 750 20000 250 50 25 0 0 0
cpu1 2500 125 750 20000 250 50 25 0 0 0
intr 31 0 0 7
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
";
        let info = parse_stat(content);

        assert_eq!(info.btime.as_deref(), Some("1700000000"));
        assert_eq!(info.ctxt.as_deref(), Some("500000"));
        assert_eq!(info.intr.as_deref(), Some("31"));
        assert_eq!(info.processes.as_deref(), Some("10000"));
        assert_eq!(info.procs_running.as_deref(), Some("2"));
        assert_eq!(info.procs_blocked.as_deref(), Some("0"));

        // The aggregate "cpu" line is not an indexed CPU.
        assert_eq!(info.cpus.len(), 2);
        assert_eq!(info.cpus[&0], vec![2500, 125, 750, 20000, 250, 50, 25, 0, 0, 0]);
        assert_eq!(info.cpus[&1][3], 20000);
    }

    #[test]
    fn test_parse_stat_partial_source() {
        let info = parse_stat("btime 1700000000\n");
        assert_eq!(info.btime.as_deref(), Some("1700000000"));
        assert!(info.ctxt.is_none());
        assert!(info.cpus.is_empty());
    }

    #[test]
    fn test_parse_stat_short_cpu_line() {
        // Older kernels expose fewer than 10 jiffy columns.
        let info = parse_stat("cpu0 100 200 300 400\n");
        assert_eq!(info.cpus[&0], vec![100, 200, 300, 400]);
    }

    #[test]
    fn test_parse_loadavg_verbatim_tokens() {
        let load = parse_loadavg("0.10 0.20 0.30 1/200 1234\n").unwrap();
        assert_eq!(load.load1, "0.10");
        assert_eq!(load.load5, "0.20");
        assert_eq!(load.load15, "0.30");
    }

    #[test]
    fn test_parse_loadavg_malformed() {
        assert!(parse_loadavg("").is_none());
        assert!(parse_loadavg("0.10 0.20").is_none());
    }

    #[test]
    fn test_parse_meminfo_kb_unit_normalized_to_bytes() {
        let entries = parse_meminfo("MemTotal:       16384000 kB\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "MemTotal");
        assert_eq!(entries[0].value, (16384000u64 * 1024).to_string());
    }

    #[test]
    fn test_parse_meminfo_unitless_value_verbatim() {
        let entries = parse_meminfo("HugePages_Total:       0\n");
        assert_eq!(entries[0].name, "HugePages_Total");
        assert_eq!(entries[0].value, "0");
    }

    #[test]
    fn test_parse_meminfo_parenthesized_name() {
        let entries = parse_meminfo("Active(anon):     204800 kB\n");
        assert_eq!(entries[0].name, "Active_anon");
        assert_eq!(entries[0].value, (204800u64 * 1024).to_string());
    }

    #[test]
    fn test_parse_meminfo_skips_malformed_line() {
        let entries = parse_meminfo("Garbage line without size\nMemFree: 10 kB\n");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "MemFree");
    }

    #[test]
    fn test_parse_file_nr() {
        let nr = parse_file_nr("1344\t0\t9223372036854775807\n").unwrap();
        assert_eq!(nr.allocated, "1344");
        assert_eq!(nr.maximum, "9223372036854775807");
    }

    #[test]
    fn test_parse_file_nr_malformed() {
        assert!(parse_file_nr("1344\n").is_none());
    }

    #[test]
    fn test_parse_proto_stats() {
        let content = "\
Tcp: ActiveOpens PassiveOpens
Tcp: 50 60
Udp: InDatagrams NoPorts InErrors
Udp: 70 5 0
";
        let blocks = parse_proto_stats(content);

        assert_eq!(
            blocks["Tcp"],
            vec![
                ("ActiveOpens".to_string(), "50".to_string()),
                ("PassiveOpens".to_string(), "60".to_string()),
            ]
        );
        assert_eq!(blocks["Udp"].len(), 3);
    }

    #[test]
    fn test_parse_proto_stats_prefix_blocks_stay_distinct() {
        // "Icmp" must not swallow "IcmpMsg" lines: pairing is by the exact
        // first token.
        let content = "\
Icmp: InMsgs InErrors
Icmp: 10 0
IcmpMsg: InType3 OutType3
IcmpMsg: 7 8
";
        let blocks = parse_proto_stats(content);
        assert_eq!(blocks["Icmp"][0], ("InMsgs".to_string(), "10".to_string()));
        assert_eq!(blocks["IcmpMsg"][1], ("OutType3".to_string(), "8".to_string()));
    }

    #[test]
    fn test_parse_proto_stats_short_value_line() {
        let blocks = parse_proto_stats("Ip: A B C\nIp: 1 2\n");
        // The unmatched trailing field is dropped, never emitted valueless.
        assert_eq!(blocks["Ip"].len(), 2);
    }

    #[test]
    fn test_parse_proto_stats_empty() {
        assert!(parse_proto_stats("").is_empty());
    }

    #[test]
    fn test_parse_net_dev() {
        let content = "\
Inter-|   Receive                                                |  Transmit
 face |bytes    packets errs drop fifo frame compressed multicast|bytes    packets errs drop fifo colls carrier compressed
    lo: 1234567     1234    0    0    0     0          0         0  1234567     1234    0    0    0     0       0          0
  eth0: 9876543     5678    1    2    0     0          0        10 87654321     4321    3    4    0     0       0          0
";
        let devices = parse_net_dev(content);

        assert_eq!(devices.len(), 2);
        assert_eq!(devices[0].name, "lo");
        assert_eq!(devices[0].fields[0], "1234567");
        assert_eq!(devices[1].name, "eth0");
        assert_eq!(devices[1].fields[8], "87654321");
        assert_eq!(devices[1].fields.len(), 16);
    }

    #[test]
    fn test_parse_net_dev_skips_short_lines() {
        let devices = parse_net_dev("eth0: 1 2 3\n");
        assert!(devices.is_empty());
    }
}

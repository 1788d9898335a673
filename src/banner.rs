//! Plain-text login banner.
//!
//! Facts come through the [`FactsProvider`] seam so the binary can swap the
//! live [`SystemFacts`] for the fixed [`DemoFacts`]. Rendering is driven by
//! the config: `display.*` flags pick lines, `network.*` trims the address
//! list, `layout.sections` orders the sections, `layout.compact` folds
//! everything onto one line and `ascii.color`/`ascii.monochrome` color the
//! hostname header. A fact the provider could not gather is left out even
//! when its flag is on.

use crate::config::SysgreetConfig;

const RESET: &str = "\x1b[0m";
const PALETTE: [&str; 8] = [
    "red", "green", "yellow", "blue", "purple", "cyan", "gray", "white",
];

/// What the banner shows about the machine and session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostFacts {
    pub hostname: String,
    pub os: String,
    pub arch: String,
    pub user: String,
    /// SSH client address, when logged in over SSH.
    pub remote_ip: Option<String>,
    pub datetime: String,
    pub uptime: Option<String>,
    /// Load averages over 1, 5 and 15 minutes.
    pub load: Option<String>,
    pub memory: Option<String>,
    pub disk: Option<String>,
    /// `(interface, address)` pairs in display order.
    pub interfaces: Vec<(String, String)>,
    pub last_login: Option<String>,
}

pub trait FactsProvider {
    fn facts(&self) -> HostFacts;
}

/// Facts read from the running system with the standard library only.
///
/// Uptime, load and memory come from `/proc` and are absent elsewhere.
/// Disk usage, interface addresses and the previous login need OS APIs
/// outside std and are never filled.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemFacts;

impl FactsProvider for SystemFacts {
    fn facts(&self) -> HostFacts {
        HostFacts {
            hostname: hostname(),
            os: os_name(),
            arch: std::env::consts::ARCH.to_string(),
            user: first_env(&["USER", "USERNAME"]).unwrap_or_else(|| "unknown".into()),
            remote_ip: first_env(&["SSH_CONNECTION", "SSH_CLIENT"])
                .and_then(|raw| raw.split_whitespace().next().map(str::to_string)),
            datetime: chrono::Local::now()
                .format("%Y-%m-%d %H:%M:%S %:z")
                .to_string(),
            uptime: read_proc("uptime").as_deref().and_then(parse_uptime),
            load: read_proc("loadavg").as_deref().and_then(parse_loadavg),
            memory: read_proc("meminfo").as_deref().and_then(parse_meminfo),
            disk: None,
            interfaces: Vec::new(),
            last_login: None,
        }
    }
}

fn first_env(names: &[&str]) -> Option<String> {
    names
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .find(|v| !v.trim().is_empty())
}

fn read_proc(name: &str) -> Option<String> {
    std::fs::read_to_string(format!("/proc/{name}")).ok()
}

fn hostname() -> String {
    std::fs::read_to_string("/etc/hostname")
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| first_env(&["HOSTNAME", "COMPUTERNAME"]))
        .unwrap_or_else(|| "localhost".into())
}

fn os_name() -> String {
    let pretty = std::fs::read_to_string("/etc/os-release")
        .ok()
        .and_then(|content| {
            content.lines().find_map(|line| {
                line.strip_prefix("PRETTY_NAME=")
                    .map(|v| v.trim_matches('"').to_string())
            })
        });
    pretty.unwrap_or_else(|| std::env::consts::OS.to_string())
}

/// `/proc/uptime`: seconds since boot as the first field.
fn parse_uptime(content: &str) -> Option<String> {
    let secs: f64 = content.split_whitespace().next()?.parse().ok()?;
    Some(format_duration(secs as u64))
}

fn format_duration(secs: u64) -> String {
    let (days, hours, mins) = (secs / 86_400, secs % 86_400 / 3_600, secs % 3_600 / 60);
    match (days, hours) {
        (0, 0) => format!("{mins}m"),
        (0, _) => format!("{hours}h {mins}m"),
        _ => format!("{days}d {hours}h {mins}m"),
    }
}

/// `/proc/loadavg`: the first three fields.
fn parse_loadavg(content: &str) -> Option<String> {
    let fields: Vec<&str> = content.split_whitespace().take(3).collect();
    (fields.len() == 3).then(|| fields.join(", "))
}

/// `/proc/meminfo`: used is `MemTotal - MemAvailable`.
fn parse_meminfo(content: &str) -> Option<String> {
    let field = |key: &str| -> Option<u64> {
        content.lines().find_map(|line| {
            line.strip_prefix(key)?
                .strip_prefix(':')?
                .split_whitespace()
                .next()?
                .parse()
                .ok()
        })
    };
    let total = field("MemTotal")?;
    let available = field("MemAvailable")?;
    Some(format!(
        "{} / {}",
        gib(total.saturating_sub(available)),
        gib(total)
    ))
}

fn gib(kib: u64) -> String {
    format!("{:.1} GiB", kib as f64 / (1024.0 * 1024.0))
}

/// Fixed facts for `--demo` and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct DemoFacts;

impl FactsProvider for DemoFacts {
    fn facts(&self) -> HostFacts {
        HostFacts {
            hostname: "demo-host".into(),
            os: "Ubuntu 24.04 LTS".into(),
            arch: "x86_64".into(),
            user: "demo".into(),
            remote_ip: Some("203.0.113.10".into()),
            datetime: "2024-01-01 09:00:00 +00:00".into(),
            uptime: Some("3d 4h 12m".into()),
            load: Some("0.42, 0.36, 0.30".into()),
            memory: Some("3.1 GiB / 7.7 GiB".into()),
            disk: Some("41.0 GiB / 100.0 GiB (/)".into()),
            interfaces: vec![
                ("eth0".into(), "192.0.2.15".into()),
                ("docker0".into(), "172.17.0.1".into()),
            ],
            last_login: Some("2023-12-31 18:22 from 198.51.100.7".into()),
        }
    }
}

struct Section {
    title: &'static str,
    lines: Vec<String>,
}

/// Render the banner. The result has no trailing newline.
pub fn render_banner(facts: &HostFacts, config: &SysgreetConfig) -> String {
    let display = &config.display;
    let header = display
        .hostname
        .then(|| colorize(&facts.hostname, config));

    let mut sections = Vec::new();
    for name in &config.layout.sections {
        let (title, lines) = match name.trim().to_ascii_lowercase().as_str() {
            "system" => ("System", system_lines(facts, config)),
            "network" => ("Network", network_lines(facts, config)),
            "resources" => ("Resources", resource_lines(facts, config)),
            _ => continue,
        };
        if !lines.is_empty() {
            sections.push(Section { title, lines });
        }
    }

    if config.layout.compact {
        let mut parts: Vec<String> = header.into_iter().collect();
        for section in sections {
            parts.push(section.title.to_string());
            parts.extend(section.lines);
        }
        return parts.join(" | ");
    }

    let mut out = String::new();
    if let Some(header) = header {
        out.push_str(&header);
        out.push('\n');
    }
    for section in sections {
        out.push('\n');
        out.push_str(section.title);
        out.push('\n');
        for line in section.lines {
            out.push_str("  ");
            out.push_str(&line);
            out.push('\n');
        }
    }
    out.trim_matches('\n').to_string()
}

fn system_lines(facts: &HostFacts, config: &SysgreetConfig) -> Vec<String> {
    let display = &config.display;
    let mut lines = Vec::new();
    if display.os {
        lines.push(format!("OS: {} ({})", facts.os, facts.arch));
    }
    if display.user {
        lines.push(format!("User: {}", facts.user));
    }
    push_fact(&mut lines, display.uptime, "Uptime", facts.uptime.as_deref());
    if display.datetime {
        lines.push(format!("Date: {}", facts.datetime));
    }
    push_fact(&mut lines, display.last_login, "Last login", facts.last_login.as_deref());
    lines
}

fn network_lines(facts: &HostFacts, config: &SysgreetConfig) -> Vec<String> {
    let mut lines = Vec::new();
    if config.display.ip_addresses {
        let limit = config.network.max_interfaces as usize;
        for (name, addr) in facts.interfaces.iter().take(limit) {
            lines.push(if config.network.show_interface_names {
                format!("IP: {addr} ({name})")
            } else {
                format!("IP: {addr}")
            });
        }
    }
    push_fact(&mut lines, config.display.remote_ip, "Remote", facts.remote_ip.as_deref());
    lines
}

fn resource_lines(facts: &HostFacts, config: &SysgreetConfig) -> Vec<String> {
    let display = &config.display;
    let mut lines = Vec::new();
    push_fact(&mut lines, display.load, "Load", facts.load.as_deref());
    push_fact(&mut lines, display.memory, "Memory", facts.memory.as_deref());
    push_fact(&mut lines, display.disk, "Disk", facts.disk.as_deref());
    lines
}

fn push_fact(lines: &mut Vec<String>, enabled: bool, label: &str, value: Option<&str>) {
    if let (true, Some(value)) = (enabled, value) {
        lines.push(format!("{label}: {value}"));
    }
}

fn colorize(text: &str, config: &SysgreetConfig) -> String {
    if config.ascii.monochrome {
        return text.to_string();
    }
    match color_code(&pick_color(&config.ascii.color, text)) {
        Some(code) => format!("{code}{text}{RESET}"),
        None => text.to_string(),
    }
}

/// `random` (or empty) picks from the palette, stable for a given hostname.
fn pick_color(name: &str, hostname: &str) -> String {
    let name = name.trim().to_ascii_lowercase();
    if name.is_empty() || name == "random" {
        let seed = hostname.bytes().fold(0usize, |acc, b| acc.wrapping_add(b as usize));
        return PALETTE[seed % PALETTE.len()].to_string();
    }
    name
}

fn color_code(name: &str) -> Option<&'static str> {
    Some(match name {
        "red" => "\x1b[31m",
        "green" => "\x1b[32m",
        "yellow" => "\x1b[33m",
        "blue" => "\x1b[34m",
        "purple" => "\x1b[35m",
        "cyan" => "\x1b[36m",
        "gray" => "\x1b[37m",
        "white" | "brightwhite" => "\x1b[97m",
        "brightblue" => "\x1b[94m",
        "brightcyan" => "\x1b[96m",
        _ => return None,
    })
}

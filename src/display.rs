// Console dashboard: one grid table per snapshot section.

use crate::models::{Snapshot, bytes_to_gb};
use chrono::{DateTime, Local};
use console::{Color, measure_text_width, style};
use std::io::{self, Write};

const RULE_WIDTH: usize = 60;

pub struct Presenter {
    colored: bool,
}

impl Presenter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    /// Colors on only when stdout is a terminal that supports them.
    pub fn for_stdout() -> Self {
        Self::new(console::colors_enabled())
    }

    pub fn display<W: Write>(&self, snapshot: &Snapshot, out: &mut W) -> io::Result<()> {
        out.write_all(self.render(snapshot, Local::now()).as_bytes())
    }

    pub fn render(&self, snapshot: &Snapshot, now: DateTime<Local>) -> String {
        let mut s = String::new();
        s.push_str(&self.banner(
            &format!("System Monitor Dashboard - {}", now.format("%Y-%m-%d %H:%M:%S")),
            Color::White,
        ));

        let cpu = &snapshot.cpu;
        s.push_str(&self.banner("CPU", Color::Cyan));
        s.push_str(&render_grid(
            &["Metric", "Value"],
            &[
                row("Model", &cpu.model),
                row("Cores", &cpu.cpu_count.to_string()),
                row("Usage (%)", &format!("{:.2}%", cpu.usage_percent)),
                row("User time (s)", &format!("{:.2}", cpu.cpu_times.user)),
                row("System time (s)", &format!("{:.2}", cpu.cpu_times.system)),
                row("Idle time (s)", &format!("{:.2}", cpu.cpu_times.idle)),
            ],
        ));

        let mem = &snapshot.memory;
        s.push_str(&self.banner("Memory", Color::Green));
        s.push_str(&render_grid(
            &["Metric", "Value"],
            &[
                row("Total (GB)", &format!("{:.2}", bytes_to_gb(mem.total))),
                row("Used (GB)", &format!("{:.2}", bytes_to_gb(mem.used))),
                row("Available (GB)", &format!("{:.2}", bytes_to_gb(mem.available))),
                row("Usage (%)", &format!("{:.2}%", mem.percentage)),
            ],
        ));

        let disk = &snapshot.disk;
        s.push_str(&self.banner("Disk", Color::Yellow));
        s.push_str(&render_grid(
            &["Metric", "Value"],
            &[
                row("Mount", &disk.mount),
                row("Total (GB)", &format!("{:.2}", bytes_to_gb(disk.total))),
                row("Used (GB)", &format!("{:.2}", bytes_to_gb(disk.used))),
                row("Free (GB)", &format!("{:.2}", bytes_to_gb(disk.free))),
                row("Usage (%)", &format!("{:.2}%", disk.percentage)),
            ],
        ));

        if !snapshot.network.is_empty() {
            s.push_str(&self.banner("Network Interfaces", Color::Magenta));
            let rows: Vec<Vec<String>> = snapshot
                .network
                .pairs()
                .map(|(iface, addr)| row(iface, addr))
                .collect();
            s.push_str(&render_grid(&["Interface", "Address"], &rows));
        }

        s.push_str(&format!("\nProcesses: {}\n", snapshot.processes.len()));
        s.push_str(&format!("\n{}\n\n", self.paint(&"=".repeat(RULE_WIDTH), Color::White)));
        s
    }

    fn banner(&self, title: &str, color: Color) -> String {
        let rule = "=".repeat(RULE_WIDTH);
        format!(
            "\n{}\n{}\n{}\n",
            self.paint(&rule, color),
            self.paint(title, color),
            self.paint(&rule, color)
        )
    }

    fn paint(&self, text: &str, color: Color) -> String {
        if self.colored {
            style(text).fg(color).force_styling(true).to_string()
        } else {
            text.to_string()
        }
    }
}

fn row(label: &str, value: &str) -> Vec<String> {
    vec![label.to_string(), value.to_string()]
}

/// Bordered grid with a `=` rule under the header, e.g.
///
/// ```text
/// +--------+-------+
/// | Metric | Value |
/// +========+=======+
/// | Cores  | 8     |
/// +--------+-------+
/// ```
pub fn render_grid(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| measure_text_width(h)).collect();
    for r in rows {
        for (i, cell) in r.iter().enumerate().take(widths.len()) {
            widths[i] = widths[i].max(measure_text_width(cell));
        }
    }

    let mut s = grid_border(&widths, '-');
    s.push_str(&grid_line(&widths, headers));
    s.push_str(&grid_border(&widths, '='));
    for r in rows {
        let cells: Vec<&str> = r.iter().map(String::as_str).collect();
        s.push_str(&grid_line(&widths, &cells));
        s.push_str(&grid_border(&widths, '-'));
    }
    s
}

fn grid_border(widths: &[usize], fill: char) -> String {
    let mut line = String::from("+");
    for w in widths {
        line.extend(std::iter::repeat_n(fill, w + 2));
        line.push('+');
    }
    line.push('\n');
    line
}

fn grid_line(widths: &[usize], cells: &[&str]) -> String {
    let mut line = String::from("|");
    for (i, w) in widths.iter().enumerate() {
        let cell = cells.get(i).copied().unwrap_or("");
        line.push(' ');
        line.push_str(cell);
        line.extend(std::iter::repeat_n(' ', w - measure_text_width(cell) + 1));
        line.push('|');
    }
    line.push('\n');
    line
}

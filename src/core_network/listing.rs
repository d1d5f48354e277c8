//! Unix `ls -l` style listing lines for LIST, and bare names for NLST.

use chrono::{DateTime, Duration, Utc};

use crate::core_driver::FileInfo;

/// One LIST line: `mode owner group size mtime name`.
pub fn format_entry(info: &FileInfo, now: DateTime<Utc>) -> String {
    format!(
        "{} {:<8} {:<8} {:>8} {} {}",
        mode_string(info),
        info.owner,
        info.group,
        info.size,
        format_mtime(info.mtime, now),
        info.name
    )
}

fn mode_string(info: &FileInfo) -> String {
    let mut out = String::with_capacity(10);
    out.push(if info.is_dir { 'd' } else { '-' });
    const CHARS: [char; 3] = ['r', 'w', 'x'];
    for i in 0..9 {
        if info.mode >> (8 - i) & 1 == 1 {
            out.push(CHARS[i % 3]);
        } else {
            out.push('-');
        }
    }
    out
}

// Timestamps within six months show the clock time, older (or future)
// ones show the year, like ls.
fn format_mtime(mtime: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let age = now.signed_duration_since(mtime);
    if age < Duration::days(183) && age > Duration::days(-183) {
        mtime.format("%b %e %H:%M").to_string()
    } else {
        mtime.format("%b %e  %Y").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(mode: u32, is_dir: bool) -> FileInfo {
        FileInfo {
            name: "hello.txt".to_string(),
            size: 1234,
            mtime: Utc.with_ymd_and_hms(2020, 3, 7, 14, 30, 0).unwrap(),
            mode,
            is_dir,
            owner: "owner".to_string(),
            group: "group".to_string(),
        }
    }

    #[test]
    fn file_mode_string() {
        let now = Utc.with_ymd_and_hms(2020, 4, 1, 0, 0, 0).unwrap();
        let line = format_entry(&entry(0o644, false), now);
        assert!(line.starts_with("-rw-r--r-- "), "line: {}", line);
        assert!(line.ends_with(" hello.txt"));
        assert!(line.contains("1234"));
    }

    #[test]
    fn directory_mode_string() {
        let now = Utc.with_ymd_and_hms(2020, 4, 1, 0, 0, 0).unwrap();
        let line = format_entry(&entry(0o755, true), now);
        assert!(line.starts_with("drwxr-xr-x "), "line: {}", line);
    }

    #[test]
    fn recent_mtime_shows_clock() {
        let now = Utc.with_ymd_and_hms(2020, 4, 1, 0, 0, 0).unwrap();
        let line = format_entry(&entry(0o644, false), now);
        assert!(line.contains("Mar  7 14:30"), "line: {}", line);
    }

    #[test]
    fn old_mtime_shows_year() {
        let now = Utc.with_ymd_and_hms(2023, 4, 1, 0, 0, 0).unwrap();
        let line = format_entry(&entry(0o644, false), now);
        assert!(line.contains("Mar  7  2020"), "line: {}", line);
        assert!(!line.contains("14:30"));
    }
}

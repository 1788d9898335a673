#[cfg(test)]
pub mod test {
    use std::io::Read;
    use std::path::Path;

    use chrono::{DateTime, TimeZone, Utc};

    /// A fixed UTC instant.
    pub fn at(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .unwrap()
    }

    /// File names in `dir`, sorted.
    pub fn sorted_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Names and contents of every file in `dir`, for before/after comparisons.
    pub fn snapshot(dir: &Path) -> Vec<(String, Vec<u8>)> {
        sorted_names(dir)
            .into_iter()
            .map(|name| {
                let bytes = std::fs::read(dir.join(&name)).unwrap_or_default();
                (name, bytes)
            })
            .collect()
    }

    /// A reader whose every read fails.
    pub struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(
                std::io::ErrorKind::BrokenPipe,
                "stdin went away",
            ))
        }
    }

    /// Environment pairs from string literals.
    pub fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}

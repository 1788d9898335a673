use toml::{Table, Value};

/// Deep-merge `overlay` into `base` in place.
///
/// Tables present on both sides are merged recursively; any other value in
/// `overlay` replaces the one in `base`.
pub fn merge_into(base: &mut Table, overlay: Table) {
    for (key, incoming) in overlay {
        match (base.remove(&key), incoming) {
            (Some(Value::Table(mut existing)), Value::Table(nested)) => {
                merge_into(&mut existing, nested);
                base.insert(key, Value::Table(existing));
            }
            (_, incoming) => {
                base.insert(key, incoming);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(toml_str: &str) -> Table {
        toml_str.parse::<Table>().unwrap()
    }

    #[test]
    fn overlay_scalar_wins_and_siblings_survive() {
        let mut base = table("[ascii]\nfont = \"slant\"\ncolor = \"red\"\n");
        merge_into(&mut base, table("[ascii]\ncolor = \"blue\"\n"));
        assert_eq!(base["ascii"]["font"].as_str().unwrap(), "slant");
        assert_eq!(base["ascii"]["color"].as_str().unwrap(), "blue");
    }

    #[test]
    fn disjoint_sections_combine() {
        let mut base = table("[display]\nuptime = false\n");
        merge_into(&mut base, table("[network]\nmax_interfaces = 1\n"));
        assert!(!base["display"]["uptime"].as_bool().unwrap());
        assert_eq!(base["network"]["max_interfaces"].as_integer().unwrap(), 1);
    }

    #[test]
    fn arrays_are_replaced_not_appended() {
        let mut base = table("[layout]\nsections = [\"header\", \"system\"]\n");
        merge_into(&mut base, table("[layout]\nsections = [\"network\"]\n"));
        let sections = base["layout"]["sections"].as_array().unwrap();
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].as_str().unwrap(), "network");
    }

    #[test]
    fn table_replaces_scalar() {
        let mut base = table("ascii = \"oops\"\n");
        merge_into(&mut base, table("[ascii]\nfont = \"big\"\n"));
        assert_eq!(base["ascii"]["font"].as_str().unwrap(), "big");
    }
}

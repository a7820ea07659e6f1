/// One tier of a [`SizeFormatter`]: the suffix appended to the value and the number of
/// decimals it is printed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unit {
    pub suffix: &'static str,
    pub precision: usize,
}

impl Unit {
    pub const fn new(suffix: &'static str, precision: usize) -> Self {
        Self { suffix, precision }
    }
}

/// Renders a (byte) count in a compact human-readable way: `12`, `34.00k`, `56.00M`, ...
///
/// A formatter is configured with a `base` (usually 1000 or 1024) and an ordered list of
/// units from smallest to largest. The value is divided by `base` until it drops below it,
/// and the rounding check happens *before* printing, so a value that would display as
/// `1000.00` of some unit is promoted to the next unit instead.
///
/// # Examples
///
/// ```
/// use ferris_usage::size_format::SizeFormatter;
/// let bytes = SizeFormatter::bytes();
/// assert_eq!(bytes.format(512), "512B");
/// assert_eq!(bytes.format(49_152), "49.15KB");
/// assert_eq!(bytes.format(999_999), "1.00MB");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SizeFormatter {
    base: u32,
    units: Vec<Unit>,
}

impl SizeFormatter {
    /// Creates a formatter from a base and at least one unit.
    ///
    /// An empty unit list falls back to a single bare integer unit.
    pub fn new(base: u32, units: Vec<Unit>) -> Self {
        let units = if units.is_empty() {
            vec![Unit::new("", 0)]
        } else {
            units
        };
        Self { base, units }
    }

    /// Plain counts, used for inode totals: `12`, `3.40k`, `5.00M`.
    pub fn count() -> Self {
        Self::new(
            1000,
            vec![
                Unit::new("", 0),
                Unit::new("k", 2),
                Unit::new("M", 2),
                Unit::new("G", 2),
                Unit::new("T", 2),
            ],
        )
    }

    /// Decimal byte sizes: `12B`, `3.40KB`, `5.00MB`.
    pub fn bytes() -> Self {
        Self::new(
            1000,
            vec![
                Unit::new("B", 0),
                Unit::new("KB", 2),
                Unit::new("MB", 2),
                Unit::new("GB", 2),
                Unit::new("TB", 2),
            ],
        )
    }

    /// Binary byte sizes: `12B`, `3.32KiB`, `4.77MiB`.
    pub fn bytes_binary() -> Self {
        Self::new(
            1024,
            vec![
                Unit::new("B", 0),
                Unit::new("KiB", 2),
                Unit::new("MiB", 2),
                Unit::new("GiB", 2),
                Unit::new("TiB", 2),
            ],
        )
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    /// Formats a magnitude with the first unit that keeps its rounded value below `base`.
    pub fn format(&self, magnitude: u64) -> String {
        let base = f64::from(self.base);
        let mut value = magnitude as f64;
        let (last, tiers) = match self.units.split_last() {
            Some(split) => split,
            None => return magnitude.to_string(),
        };

        for unit in tiers {
            if round_to_hundredths(value) < base {
                return render(value, unit);
            }
            value /= base;
        }
        render(value, last)
    }
}

impl Default for SizeFormatter {
    fn default() -> Self {
        Self::count()
    }
}

fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn render(value: f64, unit: &Unit) -> String {
    if unit.precision == 0 {
        // integer tiers truncate, like `%d`
        format!("{}{}", value.trunc() as u64, unit.suffix)
    } else {
        format!("{:.*}{}", unit.precision, value, unit.suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_format() {
        let f = SizeFormatter::count();
        assert_eq!(f.format(0), "0");
        assert_eq!(f.format(999), "999");
        assert_eq!(f.format(1000), "1.00k");
        assert_eq!(f.format(3400), "3.40k");
        assert_eq!(f.format(5_000_000), "5.00M");
    }

    #[test]
    fn test_rounding_promotes_to_next_unit() {
        let f = SizeFormatter::bytes();
        assert_eq!(f.format(999_994), "999.99KB");
        assert_eq!(f.format(999_999), "1.00MB");
    }

    #[test]
    fn test_leading_numeral_is_monotonic_within_a_unit() {
        let f = SizeFormatter::bytes();
        // displayed value expressed in KB, plus the bare numeral
        let leading = |n: u64| -> (f64, f64) {
            let s = f.format(n);
            let numeral: f64 = s.trim_end_matches(char::is_alphabetic).parse().unwrap();
            let scale = if s.ends_with("MB") { 1000.0 } else { 1.0 };
            (numeral * scale, numeral)
        };
        let mut previous = leading(990_000).0;
        for n in (990_000..1_000_000).step_by(7) {
            let (current, numeral) = leading(n);
            assert!(current >= previous, "{} dropped below {}", n, previous);
            assert!(numeral < 1000.0, "{} displayed as {}", n, f.format(n));
            previous = current;
        }
        assert_eq!(f.format(1_000_000), "1.00MB");
    }

    #[test]
    fn test_binary_format() {
        let f = SizeFormatter::bytes_binary();
        assert_eq!(f.format(1023), "1023B");
        assert_eq!(f.format(1024), "1.00KiB");
        assert_eq!(f.format(1536), "1.50KiB");
        assert_eq!(f.format(1024 * 1024), "1.00MiB");
    }

    #[test]
    fn test_top_unit_is_unbounded() {
        let f = SizeFormatter::bytes();
        assert_eq!(f.format(5_000_000_000_000_000), "5000.00TB");
    }
}

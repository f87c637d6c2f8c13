/// Human readable size, e.g. `format_bytes!(1_500_000)` is `1.50 MB` and
/// `format_bytes!(2048, "/s")` is `2.05 KB/s`.
#[macro_export]
macro_rules! format_bytes {
    ($bytes: expr, $suffix: literal) => {{
        let bytes: i64 = $bytes;
        let tb = i64::pow(10, 12);
        let gb = i64::pow(10, 9);
        let mb = i64::pow(10, 6);
        let kb = i64::pow(10, 3);

        if bytes >= tb {
            format!("{:.2} TB{}", bytes as f64 / tb as f64, $suffix)
        } else if bytes >= gb {
            format!("{:.2} GB{}", bytes as f64 / gb as f64, $suffix)
        } else if bytes >= mb {
            format!("{:.2} MB{}", bytes as f64 / mb as f64, $suffix)
        } else if bytes >= kb {
            format!("{:.2} KB{}", bytes as f64 / kb as f64, $suffix)
        } else {
            format!("{} B{}", bytes.max(0), $suffix)
        }
    }};

    ($bytes: expr) => {
        $crate::format_bytes!($bytes, "")
    };
}

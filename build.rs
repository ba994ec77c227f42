use std::io::Write;
use std::path::PathBuf;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // For each hid.bin file in our tests/data directory, create one basic test function
    // that parses that report descriptor and checks the reports' sizes add up
    let datadir: PathBuf = [concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data")]
        .iter()
        .collect();
    let out_dir = std::env::var_os("OUT_DIR").ok_or("OUT_DIR is not set")?;
    let dest_path = PathBuf::from(&out_dir).join("test-report-descriptors.rs");
    let mut file = std::fs::File::create(dest_path)?;

    println!("cargo:rerun-if-changed=tests/data");

    writeln!(file, "use hidfield::*;")?;
    writeln!(file)?;

    // The data files are excluded from the published crate
    let Ok(entries) = std::fs::read_dir(&datadir) else {
        return Ok(());
    };

    let mut paths: Vec<PathBuf> = entries
        .flatten()
        .map(|e| e.path())
        .filter(|p| p.to_string_lossy().ends_with(".hid.bin"))
        .collect();
    paths.sort();

    for path in paths {
        let filename = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .ok_or("Invalid file name")?;
        let funcname = filename.replace([':', '.', '-'], "_");
        writeln!(
            file,
            "
#[test]
#[allow(non_snake_case)]
fn test_{funcname}() {{
    let bytes: Vec<u8> = std::fs::read({path:?}).unwrap();
    let table = ReportTable::try_from(bytes.as_slice())
        .unwrap_or_else(|e| panic!(\"Failed to parse {filename}: {{e}}\"));
    assert!(table.is_valid());
    for direction in [Direction::Input, Direction::Output, Direction::Feature] {{
        for report in table.reports(direction) {{
            let bits: usize = report.fields().iter().map(|f| f.size_in_bits()).sum();
            assert_eq!(report.size_in_bits(), bits);
        }}
    }}
}}
"
        )?;
    }

    Ok(())
}

use arus_application::meta::engine_name;
use std::path::PathBuf;

pub(super) fn run_report(input: PathBuf) -> Result<(), String> {
    let report_path = input.join("report.json");
    if !report_path.exists() {
        return Err(format!("report.json not found in {}", input.display()));
    }
    let report = std::fs::read_to_string(&report_path)
        .map_err(|err| format!("failed to read report: {}", err))?;
    println!("{} cli: report\n{}", engine_name(), report);
    Ok(())
}

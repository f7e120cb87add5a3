use settlement_stats::loader::load_settlements;
use settlement_stats::output::{write_json, write_records_csv};
use settlement_stats::StatisticsFacade;
use std::io::Write;
use tempfile::TempDir;

const CSV: &str = "\
region,municipality,settlement,type,population,children
Тверская,Ржевский,Ржев,г,56000,9000
Тверская,Ржевский,Победа,п,1200,200
Тверская,Ржевский,Бахмутово,д,0,0
Тверская,Торжокский,Торжок,г,43000,7000
Ярославская,Рыбинский,Рыбинск,г,180000,30000
Ярославская,Рыбинский,Песочное,пгт,3500,
";

#[test]
fn csv_to_exported_overview() {
    let dir = TempDir::new().unwrap();
    let csv_path = dir.path().join("settlements.csv");
    std::fs::File::create(&csv_path)
        .unwrap()
        .write_all(CSV.as_bytes())
        .unwrap();

    let (source, report) = load_settlements(&csv_path).unwrap();
    assert_eq!(report.loaded_rows, 6);
    assert_eq!(report.regions, 2);
    assert_eq!(report.municipalities, 3);

    let facade = StatisticsFacade::new(&source);
    let overview = facade.overview().unwrap();

    assert_eq!(overview.top_regions[0]["name"], "Ярославская");
    assert_eq!(overview.top_regions[0]["population"], "183 500");
    assert_eq!(overview.top_regions[1]["population"], "100 200");
    assert_eq!(overview.general_stats.empty_settlements, 1);
    assert_eq!(overview.settlement_types[0]["type"], "Город");

    write_records_csv(&dir.path().join("top_regions.csv"), &overview.top_regions).unwrap();
    write_json(&dir.path().join("overview.json"), &overview).unwrap();

    let exported = std::fs::read_to_string(dir.path().join("top_regions.csv")).unwrap();
    assert!(exported.starts_with("name,population,municipalities,settlements\n"));
    assert!(exported.contains("Ярославская,183 500,1,2"));

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("overview.json")).unwrap())
            .unwrap();
    assert_eq!(json["general_stats"]["regions"], 2);
    assert_eq!(json["breadcrumb"][0]["url"], "/settlements/");
}

#[test]
fn missing_csv_is_an_io_error() {
    let err = load_settlements(std::path::Path::new("/nonexistent/settlements.csv")).unwrap_err();
    assert!(matches!(err, settlement_stats::Error::Io(_)));
}

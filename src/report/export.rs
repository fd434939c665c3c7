use crate::{
    books::{Dataset, ItemRecord, COLUMNS},
    CrawlerError,
};
use rust_xlsxwriter::{Format, Workbook};
use std::{
    fs::{self, File},
    io::{BufWriter, Write},
    path::Path,
};

const BOM: &str = "\u{feff}";

/// Writes one row per record under a `Titulo,Link,Preco,Estoque` header,
/// UTF-8 with a byte order mark.
pub fn write_csv(dataset: &Dataset, path: &Path) -> Result<(), CrawlerError> {
    let mut file = BufWriter::new(File::create(path)?);
    file.write_all(BOM.as_bytes())?;

    let mut writer = csv::Writer::from_writer(file);
    if dataset.is_empty() {
        writer.write_record(COLUMNS)?;
    }
    for record in dataset {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Loads a file written by [`write_csv`]. The byte order mark is optional.
pub fn read_csv(path: &Path) -> Result<Dataset, CrawlerError> {
    let text = fs::read_to_string(path)?;
    let text = text.strip_prefix(BOM).unwrap_or(&text);

    let records = csv::Reader::from_reader(text.as_bytes())
        .deserialize::<ItemRecord>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records.into())
}

/// Writes a single sheet with a bold header row. Every value is written as text.
pub fn write_xlsx(dataset: &Dataset, path: &Path) -> Result<(), CrawlerError> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name("livros")?;
    for (col, name) in COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header)?;
    }
    for (row, record) in dataset.iter().enumerate() {
        for (col, value) in record.fields().iter().enumerate() {
            sheet.write_string(row as u32 + 1, col as u16, *value)?;
        }
    }

    workbook.save(path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dataset() -> Dataset {
        vec![
            ItemRecord {
                title: "A Light in the Attic".to_string(),
                link: "https://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html"
                    .to_string(),
                price: "51.77".to_string(),
                stock_status: "In stock".to_string(),
            },
            ItemRecord {
                title: "Sapiens: A Brief History of Humankind, \"Revised\"".to_string(),
                link: "https://books.toscrape.com/catalogue/sapiens_996/index.html".to_string(),
                price: "54.23".to_string(),
                stock_status: "Out of stock".to_string(),
            },
        ]
        .into()
    }

    #[test]
    fn test_csv_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livros.csv");

        let data = dataset();
        write_csv(&data, &path).unwrap();
        let back = read_csv(&path).unwrap();

        assert_eq!(back.len(), data.len());
        assert_eq!(back, data);
    }

    #[test]
    fn test_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livros.csv");
        write_csv(&dataset(), &path).unwrap();

        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0xef, 0xbb, 0xbf]));

        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.trim_start_matches(BOM).lines();
        assert_eq!(lines.next(), Some("Titulo,Link,Preco,Estoque"));
        assert_eq!(
            lines.next(),
            Some("A Light in the Attic,https://books.toscrape.com/catalogue/a-light-in-the-attic_1000/index.html,51.77,In stock")
        );
    }

    #[test]
    fn test_csv_empty_dataset_keeps_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livros.csv");
        write_csv(&Dataset::default(), &path).unwrap();

        assert!(read_csv(&path).unwrap().is_empty());
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim_start_matches(BOM).trim_end(), "Titulo,Link,Preco,Estoque");
    }

    #[test]
    fn test_csv_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livros.csv");
        write_csv(&dataset(), &path).unwrap();
        write_csv(&Dataset::default(), &path).unwrap();
        assert!(read_csv(&path).unwrap().is_empty());
    }

    #[test]
    fn test_xlsx_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("livros.xlsx");
        write_xlsx(&dataset(), &path).unwrap();

        // xlsx files are zip archives
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }
}

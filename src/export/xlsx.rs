use crate::errors::{AppError, AppResult};
use crate::export::excel_date::{DATETIME_FORMAT, parse_to_excel_date};
use crate::export::model::SHEET_HEADERS;
use crate::export::{EventExport, notify_export_success};
use crate::ui::messages::info;
use rust_xlsxwriter::{Color, Format, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

/// One worksheet per subject, rows in stored order.
pub(crate) fn export_xlsx(sheets: &[(String, Vec<EventExport>)], path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();

    if sheets.is_empty() {
        let worksheet = workbook.add_worksheet();
        worksheet.write(0, 0, "No data available")?;
        workbook.save(path_str(path)?)?;
        notify_export_success("XLSX (empty dataset)", path);
        return Ok(());
    }

    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (subject, rows) in sheets {
        // subject names are already valid sheet names
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(subject)?;

        for (col, header) in SHEET_HEADERS.iter().enumerate() {
            worksheet.write_with_format(0, col as u16, *header, &header_format)?;
        }
        worksheet.set_freeze_panes(1, 0)?;

        let mut col_widths: Vec<usize> = SHEET_HEADERS
            .iter()
            .map(|h| UnicodeWidthStr::width(*h))
            .collect();
        col_widths[0] = col_widths[0].max(DATETIME_FORMAT.len());

        for (row_index, ev) in rows.iter().enumerate() {
            let row = (row_index + 1) as u32;
            let band = if row_index % 2 == 0 {
                Color::RGB(0xEAF3FB)
            } else {
                Color::RGB(0xFFFFFF)
            };

            write_timestamp_cell(worksheet, row, &ev.timestamp, band)?;
            worksheet.write_with_format(row, 1, ev.status.as_str(), &banded(band))?;

            col_widths[0] = col_widths[0].max(UnicodeWidthStr::width(ev.timestamp.as_str()));
            col_widths[1] = col_widths[1].max(UnicodeWidthStr::width(ev.status.as_str()));
        }

        for (c, w) in col_widths.iter().enumerate() {
            worksheet.set_column_width(c as u16, *w as f64 + 2.0)?;
        }
    }

    workbook.save(path_str(path)?)?;

    notify_export_success("XLSX", path);
    Ok(())
}

fn banded(bg: Color) -> Format {
    Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin)
}

/// Parseable timestamps become real Excel dates; anything else is kept as
/// text so a damaged row stays visible.
fn write_timestamp_cell(worksheet: &mut Worksheet, row: u32, s: &str, bg: Color) -> AppResult<()> {
    match parse_to_excel_date(s) {
        Some(serial) => {
            let fmt = banded(bg).set_num_format(DATETIME_FORMAT);
            worksheet.write_with_format(row, 0, serial, &fmt)?;
        }
        None => {
            worksheet.write_with_format(row, 0, s, &banded(bg))?;
        }
    }
    Ok(())
}

fn path_str(path: &Path) -> AppResult<&str> {
    path.to_str()
        .ok_or_else(|| AppError::Export(format!("invalid path: {}", path.display())))
}

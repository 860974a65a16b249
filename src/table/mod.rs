//! Report rows → generic table.
//!
//! Callers project report rows into display cells (choosing dimensions and
//! metrics, sorting) before calling [`to_table`]; the formatter never reorders.

pub mod number_format;

use crate::markup::{Element, Markup};
use crate::utils::error::{Result, WidgetError};
use crate::utils::urls::admin_page_url;
use number_format::{num_fmt, NumberStyle};

/// Admin page that table links point at when admin URLs are requested.
pub const DASHBOARD_ADMIN_PAGE: &str = "googlesitekit-dashboard";

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl Cell {
    /// Display value; numbers go through the fixed-locale decimal formatter.
    pub fn display(&self) -> String {
        match self {
            Cell::Text(text) => text.clone(),
            Cell::Number(value) => num_fmt(*value, &NumberStyle::Decimal),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Text(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Number(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Number(value as f64)
    }
}

impl From<u64> for Cell {
    fn from(value: u64) -> Self {
        Cell::Number(value as f64)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableHeader {
    pub title: String,
    pub tooltip: Option<String>,
    pub primary: bool,
}

impl TableHeader {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tooltip: None,
            primary: false,
        }
    }

    pub fn tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableOptions {
    /// 不輸出表頭列
    pub hide_header: bool,
    /// 主欄位加上圖表色塊
    pub charts_enabled: bool,
    /// 只保留前 N 列
    pub cap: Option<usize>,
    /// 每列的連結，索引與資料列對齊
    pub links: Vec<Option<String>>,
    /// 主欄位下方額外顯示連結本身
    pub show_urls: bool,
    /// 連結改指向後台儀表板頁
    pub use_admin_urls: bool,
    /// 後台根網址，`use_admin_urls` 時使用
    pub admin_base_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableSpec {
    pub headers: Vec<TableHeader>,
    pub rows: Vec<Vec<Cell>>,
    pub links: Vec<Option<String>>,
    /// Raw link per row, shown under the primary cell when `show_urls` is set.
    pub display_urls: Vec<Option<String>>,
    pub hide_header: bool,
    pub charts_enabled: bool,
    pub show_urls: bool,
}

pub fn to_table(rows: Vec<Vec<Cell>>, headers: &[TableHeader], options: &TableOptions) -> TableSpec {
    let row_count = match options.cap {
        Some(cap) => rows.len().min(cap),
        None => rows.len(),
    };

    let mut rows = rows;
    rows.truncate(row_count);

    let display_urls: Vec<Option<String>> = (0..row_count)
        .map(|i| options.links.get(i).cloned().flatten())
        .collect();

    let links = display_urls
        .iter()
        .map(|link| {
            link.as_ref()
                .map(|link| resolve_link(link, options))
        })
        .collect();

    tracing::debug!(
        "Built table with {} headers and {} rows (cap: {:?})",
        headers.len(),
        row_count,
        options.cap
    );

    TableSpec {
        headers: headers.to_vec(),
        rows,
        links,
        display_urls,
        hide_header: options.hide_header,
        charts_enabled: options.charts_enabled,
        show_urls: options.show_urls,
    }
}

fn resolve_link(link: &str, options: &TableOptions) -> String {
    if !options.use_admin_urls {
        return link.to_string();
    }

    options
        .admin_base_url
        .as_deref()
        .and_then(|base| admin_page_url(base, DASHBOARD_ADMIN_PAGE, &[("permaLink", link)]))
        .unwrap_or_else(|| link.to_string())
}

impl TableSpec {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn link(&self, row: usize) -> Option<&str> {
        self.links.get(row).and_then(|link| link.as_deref())
    }

    /// Display values of every row.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(Cell::display).collect())
            .collect()
    }

    fn primary_column(&self) -> usize {
        self.headers
            .iter()
            .position(|header| header.primary)
            .unwrap_or(0)
    }

    pub fn to_markup(&self) -> Markup {
        let primary = self.primary_column();
        let column_count = self.headers.len();

        let mut table = Element::new("table")
            .class("googlesitekit-table__wrapper")
            .class(&format!("googlesitekit-table__wrapper--{}-col", column_count));

        if !self.hide_header {
            let head_row = Element::new("tr")
                .class("googlesitekit-table__head-row")
                .children(self.headers.iter().enumerate().map(|(i, header)| {
                    let mut th = Element::new("th")
                        .class("googlesitekit-table__head-item")
                        .class_if(i == primary, "googlesitekit-table__head-item--primary");
                    if let Some(tooltip) = &header.tooltip {
                        th = th.attr("data-tooltip", tooltip.clone());
                    }
                    th.text(header.title.clone())
                }));

            table = table.child(
                Element::new("thead")
                    .class("googlesitekit-table__head")
                    .child(head_row),
            );
        }

        let body_rows = self.rows.iter().enumerate().map(|(row_index, row)| {
            Element::new("tr")
                .class("googlesitekit-table__body-row")
                .children(row.iter().enumerate().map(|(column, cell)| {
                    let td = Element::new("td").class("googlesitekit-table__body-item");
                    if column == primary {
                        td.child(self.primary_cell(row_index, cell))
                    } else {
                        td.text(cell.display())
                    }
                }))
        });

        table = table.child(
            Element::new("tbody")
                .class("googlesitekit-table__body")
                .children(body_rows),
        );

        Element::new("div")
            .class("googlesitekit-table googlesitekit-table--with-list")
            .class_if(self.charts_enabled, "googlesitekit-table--with-chart")
            .child(table)
            .into()
    }

    fn primary_cell(&self, row_index: usize, cell: &Cell) -> Markup {
        let mut content = Element::new("div").class("googlesitekit-table__body-item-content");

        if self.charts_enabled {
            content = content.child(
                Element::new("span")
                    .class("googlesitekit-table__body-item-chart-swatch")
                    .attr("data-series", row_index.to_string()),
            );
        }

        content = match self.link(row_index) {
            Some(href) => content.child(
                Element::new("a")
                    .class("googlesitekit-table__body-item-link")
                    .attr("href", href)
                    .text(cell.display()),
            ),
            None => content.text(cell.display()),
        };

        if self.show_urls {
            if let Some(Some(url)) = self.display_urls.get(row_index) {
                content = content.child(
                    Element::new("div")
                        .class("googlesitekit-table__body-item-url")
                        .text(url.clone()),
                );
            }
        }

        content.into()
    }

    /// 以 CSV 匯出目前顯示的表格內容
    pub fn to_csv(&self) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(self.headers.iter().map(|header| header.title.as_str()))?;
        for row in self.display_rows() {
            writer.write_record(&row)?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| {
                WidgetError::IoError(std::io::Error::new(e.error().kind(), e.error().to_string()))
            })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

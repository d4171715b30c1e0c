use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use crossterm::style::Color;
use itertools::Itertools;

use crate::{
  generator::{
    naming::identifiers::binding_name,
    operations::{handler_base_name, path_operations},
  },
  ui::{Colors, colors::IntoComfyColor, term_width},
  utils::spec::SpecLoader,
};

/// `(binding, verb, path)` rows in path order, then verb order.
fn operation_rows(spec: &openapiv3::OpenAPI) -> Vec<(String, String, String)> {
  spec
    .paths
    .paths
    .iter()
    .sorted_by(|a, b| a.0.cmp(b.0))
    .filter_map(|(path, item)| Some((path, item.as_item()?)))
    .flat_map(|(path, item)| {
      path_operations(item).into_iter().map(move |(method, operation)| {
        let base = handler_base_name(&method, path, operation.operation_id.as_deref());
        (binding_name(&base), method.to_string(), path.clone())
      })
    })
    .collect()
}

/// A cell drawn in `color`; without one the cell carries no styling.
fn cell(content: impl ToString, color: Option<Color>) -> Cell {
  let cell = Cell::new(content);
  match color {
    Some(color) => cell.fg(IntoComfyColor::into(color)),
    None => cell,
  }
}

pub async fn list_operations(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let spec = SpecLoader::open(input).await?.parse()?;

  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  row.add_cell(cell("BINDING", colors.label()));
  row.add_cell(cell("METHOD", colors.label()));
  row.add_cell(cell("PATH", colors.label()));
  table.set_header(row);

  for (binding, method, path) in operation_rows(&spec) {
    let mut row = Row::new();
    row.add_cell(cell(binding, colors.value()).add_attribute(Attribute::Bold));
    row.add_cell(cell(method, colors.accent()).set_alignment(CellAlignment::Right));
    row.add_cell(cell(path, colors.primary()));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}

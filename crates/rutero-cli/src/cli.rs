use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

pub fn parse_similarity(value: &str) -> Result<f64, String> {
    let parsed = value
        .trim()
        .parse::<f64>()
        .map_err(|_| "similarity must be a number between 0 and 1".to_string())?;
    if !parsed.is_finite() || !(0.0..=1.0).contains(&parsed) {
        return Err("similarity must be a number between 0 and 1".to_string());
    }
    Ok(parsed)
}

/// Extended help shown after `rutero build --help`.
pub const BUILD_AFTER_HELP: &str = "\
Input layouts:
  Default (three tables in <input-dir>):
    clientes.csv                  id_cliente, estado_civil, pais_residencia, cant_polizas,
                                  rango_edades, genero, zonas_ciudades_cli
    facturas.csv                  no_factura, id_cliente, fecha_factura, ciudad_destino,
                                  vlr_total_neto_factura, vlr_total_item_factura,
                                  vlr_total_neto_item_factura
    proveedores_por_factura.csv   no_factura, nombre_proveedor, vlr_presupuesto_ppto

  --raw (accounting exports):
    Every *.csv file in <input-dir> is read in file-name order.
    Each row is one supplier line with the invoice and client columns repeated
    (\"No. Factura\", \"Ciudad Destino\", \"Nombre Proveedor\", ...).
    The first row of an invoice defines it; each invoice gets its own client id.

Reference data:
  The bundled gazetteer is used unless one of these is set:
    --gazetteer <file.json>                        JSON gazetteer
    --geonames-cities <file> --geonames-countries <file>
                                                   GeoNames tab-separated dumps
  --overrides <file.csv> replaces the bundled manual override table.
  The same settings can come from RUTERO_GAZETTEER, RUTERO_GEONAMES_CITIES,
  RUTERO_GEONAMES_COUNTRIES, RUTERO_OVERRIDES, RUTERO_DOMESTIC_COUNTRY and
  RUTERO_FUZZY_MIN_SIMILARITY.

What to do next:
  1. Run `rutero build <input-dir> --dry-run` and review the summary.
  2. Add override rows for labels listed under unclassified destinations.
  3. Run `rutero build <input-dir> --out master.csv` to write the master table.
";

#[derive(Debug, Parser)]
#[command(
    name = "rutero",
    version,
    about = "invoice destination enrichment for travel agencies",
    disable_help_subcommand = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Reference data and classifier settings shared by commands that classify.
#[derive(Debug, Clone, Default, Args)]
pub struct EngineArgs {
    /// JSON gazetteer file used instead of the bundled reference data
    #[arg(long, value_name = "FILE")]
    pub gazetteer: Option<PathBuf>,
    /// GeoNames cities dump (tab-separated); requires --geonames-countries
    #[arg(long, value_name = "FILE", requires = "geonames_countries")]
    pub geonames_cities: Option<PathBuf>,
    /// GeoNames countryInfo dump (tab-separated); requires --geonames-cities
    #[arg(long, value_name = "FILE", requires = "geonames_cities")]
    pub geonames_countries: Option<PathBuf>,
    /// Manual override CSV used instead of the bundled table
    #[arg(long, value_name = "FILE")]
    pub overrides: Option<PathBuf>,
    /// Country treated as domestic (default: Colombia)
    #[arg(long, value_name = "COUNTRY")]
    pub domestic_country: Option<String>,
    /// Minimum similarity for fuzzy country matches, between 0 and 1
    #[arg(long, value_name = "RATIO", value_parser = parse_similarity)]
    pub fuzzy_min_similarity: Option<f64>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify invoice destinations and build the master table
    #[command(after_long_help = BUILD_AFTER_HELP)]
    Build {
        /// Directory holding the input CSV files
        input_dir: PathBuf,
        /// Read accounting exports instead of the three normalized tables
        #[arg(long)]
        raw: bool,
        /// Destination CSV for the master table
        #[arg(long, value_name = "FILE", required_unless_present = "dry_run")]
        out: Option<PathBuf>,
        /// Build and summarize without writing a file
        #[arg(long, conflicts_with = "out")]
        dry_run: bool,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Classify free-text destination labels without reading any input files
    Classify {
        /// One or more destination labels (quote labels with spaces)
        #[arg(required = true)]
        labels: Vec<String>,
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
    /// Inspect the reference data the classifier would load
    #[command(arg_required_else_help = true)]
    Reference {
        #[command(subcommand)]
        command: ReferenceCommand,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ReferenceCommand {
    /// Show gazetteer, override and region table sizes
    Stats {
        /// Emit machine-readable JSON output
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        engine: EngineArgs,
    },
}

pub fn parse_from<I, T>(itr: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    Cli::try_parse_from(itr)
}

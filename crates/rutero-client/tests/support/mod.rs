#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use rutero_client::commands::build::{self, BuildOptions};
use serde_json::Value;

pub const CLIENTS_CSV: &str = "\
id_cliente,estado_civil,pais_residencia,cant_polizas,rango_edades,genero,zonas_ciudades_cli
C1,Casado,Colombia,2,30-40,F,Bogota
C2,Soltero,Colombia,1,20-30,M,Medellin
C3,Casado,Colombia,,40-50,F,Cartagena
";

/// F4 points at a client that does not exist; F5 has no supplier lines.
pub const INVOICES_CSV: &str = "\
no_factura,id_cliente,fecha_factura,ciudad_destino,vlr_total_neto_factura,vlr_total_item_factura,vlr_total_neto_item_factura
F1,C1,2024-03-05,CARTAGENA,1500000,1500000,1400000
F2,C2,15/07/2024,MIAMI,3200000,3000000,2900000
F3,C3,2024-11-20 10:30:00,XANADU,800000,800000,750000
F4,C9,2025-01-10,cusco,2100000,2100000,2000000
F5,C1,not a date,,0,0,0
";

pub const SUPPLIERS_CSV: &str = "\
no_factura,nombre_proveedor,vlr_presupuesto_ppto
F1,AVIANCA,900000
F1,HOTEL CARIBE,400000
F2,AMERICAN AIRLINES,2500000
F2,,100000
F3,AVIANCA,300000
F4,LATAM,1200000
F4,LATAM,300000
";

pub fn write_file(path: &Path, body: &str) {
    let result = fs::write(path, body);
    assert!(result.is_ok());
}

pub fn write_tables(root: &Path) -> PathBuf {
    let input = root.join("input");
    let created = fs::create_dir_all(&input);
    assert!(created.is_ok());
    write_file(&input.join("clientes.csv"), CLIENTS_CSV);
    write_file(&input.join("facturas.csv"), INVOICES_CSV);
    write_file(&input.join("proveedores_por_factura.csv"), SUPPLIERS_CSV);
    input
}

pub fn run_build(input: &Path, raw: bool, out: Option<&Path>) -> Value {
    let result = build::run_with_options(BuildOptions {
        input_dir: input.to_path_buf(),
        raw,
        out: out.map(Path::to_path_buf),
        ..BuildOptions::default()
    });
    assert!(result.is_ok(), "build failed: {result:?}");
    match result {
        Ok(success) => success.data,
        Err(_) => Value::Null,
    }
}

/// Master CSV rows keyed by column name, in file order.
pub fn read_master(path: &Path) -> Vec<HashMap<String, String>> {
    let reader = csv::Reader::from_path(path);
    assert!(reader.is_ok());
    let Ok(mut reader) = reader else {
        return Vec::new();
    };
    let headers = reader.headers().cloned().unwrap_or_default();
    reader
        .records()
        .filter_map(Result::ok)
        .map(|record| {
            headers
                .iter()
                .zip(record.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect()
        })
        .collect()
}

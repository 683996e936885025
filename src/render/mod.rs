pub mod cedula;

pub use cedula::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("spreadsheet error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

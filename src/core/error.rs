//! Fehlertypen des Zeichen-Kerns.

use thiserror::Error;

/// Fehler bei Geometrie-Berechnung, Eingabe-Parsing oder Host-Zugriff.
#[derive(Error, Debug)]
pub enum DrawError {
    /// Entartete Eingabe (Null-Vektor, Segmentanzahl 0, ungültige Maße)
    #[error("Ungültiges Argument: {0}")]
    InvalidArgument(String),

    /// Ungültige Längen- oder Bulge-Eingabe
    #[error("Ungültige Eingabe: {0}")]
    Parse(String),

    /// Der Host hat eine Transaktion oder Geometrie-Erzeugung abgelehnt
    #[error("Host-Operation fehlgeschlagen: {0:#}")]
    HostOperation(anyhow::Error),
}

/// Ergebnis-Typ des Zeichen-Kerns.
pub type Result<T> = std::result::Result<T, DrawError>;

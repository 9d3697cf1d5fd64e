//! Delivery acta (hand-out certificate) rendering.
//!
//! Actual PDF layout is handled by an external collaborator; the service only
//! needs something that takes a confirmed delivery and produces a file path
//! to store alongside the record. `FileActaRenderer` writes a plain-text
//! acta so the download endpoint has real bytes to serve; a PDF-producing
//! implementation can replace it behind the same trait.

use crate::model::{Item, Worker};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

#[async_trait]
pub trait ActaRenderer: Send + Sync {
    /// Render the acta for a confirmed delivery and return the stored path.
    async fn render(
        &self,
        delivery_id: i64,
        worker: &Worker,
        items: &[Item],
        delivered_at: DateTime<Utc>,
    ) -> Result<PathBuf>;
}

pub struct FileActaRenderer {
    dir: PathBuf,
}

impl FileActaRenderer {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl ActaRenderer for FileActaRenderer {
    async fn render(
        &self,
        delivery_id: i64,
        worker: &Worker,
        items: &[Item],
        delivered_at: DateTime<Utc>,
    ) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .context("failed to create acta directory")?;

        let mut body = String::new();
        body.push_str("ACTA DE ENTREGA DE UNIFORMES Y EPP\n\n");
        body.push_str(&format!("Entrega N° {delivery_id}\n"));
        body.push_str(&format!(
            "Trabajador: {} {} (DNI {})\n",
            worker.name, worker.surname, worker.dni
        ));
        body.push_str(&format!("Régimen: {}\n", worker.contract_type.as_str()));
        body.push_str(&format!("Fecha: {}\n\n", delivered_at.format("%Y-%m-%d %H:%M")));
        for item in items {
            body.push_str(&format!("  {:>3} x {}\n", item.qty, item.name));
        }

        let path = self.dir.join(format!("acta_{delivery_id}.txt"));
        tokio::fs::write(&path, body)
            .await
            .context("failed to write acta file")?;
        Ok(path)
    }
}

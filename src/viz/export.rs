use std::io::BufWriter;
use std::path::{Path, PathBuf};

use super::figure::Figure;
use crate::error::Result;

/// Write one figure as pretty-printed JSON.
pub fn save_figure(figure: &Figure, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)?;
    serde_json::to_writer_pretty(BufWriter::new(file), figure)?;
    log::info!("Figure saved to {}", path.display());
    Ok(())
}

/// Save each `(stem, figure)` as `<dir>/<stem>.json`, creating `dir`.
pub fn save_figures(figures: &[(&str, Figure)], dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    figures
        .iter()
        .map(|(stem, figure)| {
            let path = dir.join(format!("{stem}.json"));
            save_figure(figure, &path).map(|_| path)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::viz::figure::{error_curve, Figure};
    use crate::model::TrainingLog;

    #[test]
    fn saved_figure_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let figure = Figure::Curve(error_curve(&[TrainingLog { num_trees: 5, rmse: 1.5 }]));
        let out = dir.path().join("figures");
        let paths = save_figures(&[("model_evaluation", figure.clone())], &out).unwrap();
        assert_eq!(paths, vec![out.join("model_evaluation.json")]);

        let text = std::fs::read_to_string(&paths[0]).unwrap();
        assert!(text.contains("\"kind\": \"curve\""));
        let back: Figure = serde_json::from_str(&text).unwrap();
        assert_eq!(back, figure);
    }
}

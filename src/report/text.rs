use crate::report::{SummaryData, format_f64_6};

pub fn render_report_text(data: &SummaryData) -> String {
    let mut out = String::new();

    out.push_str("RNA Velocity Simulation Report\n");
    out.push_str("==============================\n\n");

    out.push_str(&format!(
        "Tool: {} {}\nCommand: {}\nSeed: {}\n\n",
        data.tool_name, data.tool_version, data.command, data.seed
    ));

    out.push_str("1. Numerics\n");
    out.push_str(&format!(
        "Look-ahead dt: {}\nNoise level: {}\nSolver rtol/atol: {:e} / {:e}\n\n",
        data.params.dt, data.params.noise_level, data.params.rtol, data.params.atol
    ));

    out.push_str("2. Path\n");
    match &data.path {
        Some(path) => {
            out.push_str(&format!("Topology: {}\n", path.topology));
            out.push_str(&format!(
                "Regime 1: alpha={} beta={} gamma={} pct={} samples={}\n",
                path.alpha1, path.beta1, path.gamma1, path.path1_pct, path.path1_samples
            ));
            if path.path2_samples > 0 {
                out.push_str(&format!(
                    "Regime 2: alpha={} beta={} gamma={} pct={} samples={}\n",
                    path.alpha2, path.beta2, path.gamma2, path.path2_pct, path.path2_samples
                ));
            }
        }
        None => out.push_str("Topology: regime table\n"),
    }
    out.push('\n');

    out.push_str("3. Dataset\n");
    out.push_str(&format!(
        "Genes: {}\nCells: {}\nRows: {}\n\n",
        data.n_genes, data.n_cells, data.n_rows
    ));

    out.push_str("4. Layers (median / p90 / p99 / max)\n");
    for s in &data.layers {
        out.push_str(&format!(
            "{}: {} / {} / {} / {}\n",
            s.name,
            format_f64_6(s.median),
            format_f64_6(s.p90),
            format_f64_6(s.p99),
            format_f64_6(s.max)
        ));
    }

    out
}

use serde::Deserialize;

use kekule::{parse_smiles, to_smiles, Bond, Graph, SmilesError};

fn report(name: &str, failures: Vec<String>, total: usize) {
    if !failures.is_empty() {
        panic!(
            "{name}: {} of {total} failed:\n{}",
            failures.len(),
            failures.join("\n")
        );
    }
}

// ---------------------------------------------------------------------------
// 1. Kekulé assignment
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct KekuleEntry {
    smiles: String,
    double_bonds: usize,
    hydrogens: Vec<u8>,
}

#[test]
fn approval_kekule() {
    let data: Vec<KekuleEntry> =
        serde_json::from_str(include_str!("approval_data/kekule.json")).unwrap();

    let mut failures = Vec::new();
    for entry in &data {
        let g = match parse_smiles(&entry.smiles) {
            Ok(g) => g,
            Err(e) => {
                failures.push(format!("[parse] {}: {e}", entry.smiles));
                continue;
            }
        };

        if g.flags(Graph::HAS_AROM) != 0 || g.atoms().iter().any(|a| a.aromatic()) {
            failures.push(format!("[aromatic] {}: still aromatic", entry.smiles));
        }

        let doubles = g.edges().iter().filter(|e| e.bond() == Bond::Double).count();
        if doubles != entry.double_bonds {
            failures.push(format!(
                "[doubles] {}: expected {}, got {doubles}",
                entry.smiles, entry.double_bonds
            ));
        }

        let hydrogens: Vec<u8> = (0..g.order()).map(|v| g.implicit_h_count(v)).collect();
        if hydrogens != entry.hydrogens {
            failures.push(format!(
                "[hydrogens] {}: expected {:?}, got {hydrogens:?}",
                entry.smiles, entry.hydrogens
            ));
        }

        // no atom may end up with two double bonds
        for v in 0..g.order() {
            let n = g.edges_of(v).filter(|e| e.bond() == Bond::Double).count();
            if n > 1 && g.atom(v).charge() == 0 {
                failures.push(format!("[cumulated] {}: atom {v}", entry.smiles));
            }
        }
    }

    report("kekule", failures, data.len());
}

// ---------------------------------------------------------------------------
// 2. Generated SMILES
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct WrittenEntry {
    smiles: String,
    written: String,
}

#[test]
fn approval_written() {
    let data: Vec<WrittenEntry> =
        serde_json::from_str(include_str!("approval_data/written.json")).unwrap();

    let mut failures = Vec::new();
    for entry in &data {
        let written = parse_smiles(&entry.smiles)
            .map_err(|e| e.to_string())
            .and_then(|g| to_smiles(&g).map_err(|e| e.to_string()));
        match written {
            Ok(w) if w == entry.written => {}
            Ok(w) => failures.push(format!(
                "[written] {}: expected {:?}, got {w:?}",
                entry.smiles, entry.written
            )),
            Err(e) => failures.push(format!("[error] {}: {e}", entry.smiles)),
        }
    }

    report("written", failures, data.len());
}

// ---------------------------------------------------------------------------
// 3. Syntax errors
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct ErrorEntry {
    smiles: String,
    message: String,
    position: usize,
}

#[test]
fn approval_errors() {
    let data: Vec<ErrorEntry> =
        serde_json::from_str(include_str!("approval_data/errors.json")).unwrap();

    let mut failures = Vec::new();
    for entry in &data {
        match parse_smiles(&entry.smiles) {
            Err(SmilesError::Syntax { kind, pos, .. }) => {
                if kind.to_string() != entry.message || pos != entry.position {
                    failures.push(format!(
                        "[error] {}: expected {:?} at {}, got {:?} at {pos}",
                        entry.smiles,
                        entry.message,
                        entry.position,
                        kind.to_string()
                    ));
                }
            }
            other => failures.push(format!(
                "[error] {}: expected a syntax error, got {other:?}",
                entry.smiles
            )),
        }
    }

    report("errors", failures, data.len());
}

use std::collections::HashMap;
use std::path::Path;

const SEGMENTS: [&str; 7] = ["PB2", "PB1", "PA", "NP", "NA", "MP", "NS"];
const IUPAC: &str = "ACGTUWSMKRYBDHVNZ-";

fn main() {
    let references = load_json(Path::new("data/references.json"), "PANEL");
    let models = load_json(Path::new("data/models.json"), "MODELS");
    let ref_lengths = validate_panel(&references);
    let compositions = validate_compositions(Path::new("data/compositions.tsv"));
    validate_models(&models, &ref_lengths, &compositions);
    set_build_dependencies();
}

fn load_json(path: &Path, kind: &str) -> serde_json::Value {
    assert!(
        path.exists(),
        "\n\n{kind} BUILD ERROR: File not found\n\
         Path: {}\n\
         Please create the data file before building.\n",
        path.display()
    );

    let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
        panic!(
            "\n\n{kind} BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            path.display()
        );
    });

    serde_json::from_str(&contents).unwrap_or_else(|e| {
        panic!(
            "\n\n{kind} BUILD ERROR: Invalid JSON\n\
             Path: {}\n\
             Error: {e}\n\
             Hint: Check for missing commas, brackets, or invalid syntax.\n",
            path.display()
        );
    })
}

/// Returns segment name -> reference length for every predicted segment.
fn validate_panel(panel: &serde_json::Value) -> HashMap<String, usize> {
    let references = panel
        .get("references")
        .and_then(|r| r.as_object())
        .unwrap_or_else(|| {
            panic!(
                "\n\nPANEL BUILD ERROR: Missing 'references' object\n\
                 The panel must map segment names to reference sequences.\n"
            );
        });

    let mut lengths = HashMap::new();
    for (segment, seq) in references {
        assert!(
            SEGMENTS.contains(&segment.as_str()),
            "\n\nPANEL BUILD ERROR: Unknown segment '{segment}' in references\n\
             Recognized segments: {SEGMENTS:?}\n"
        );

        let seq = seq.as_str().unwrap_or_else(|| {
            panic!("\n\nPANEL BUILD ERROR: Reference for '{segment}' must be a string\n");
        });
        assert!(
            !seq.is_empty(),
            "\n\nPANEL BUILD ERROR: Reference for '{segment}' is empty\n"
        );
        for (i, c) in seq.chars().enumerate() {
            assert!(
                IUPAC.contains(c),
                "\n\nPANEL BUILD ERROR: Reference for '{segment}' has invalid symbol '{c}' at position {i}\n"
            );
        }
        lengths.insert(segment.clone(), seq.len());
    }

    let fixed = panel
        .get("fixed_versions")
        .and_then(|f| f.as_object())
        .unwrap_or_else(|| {
            panic!("\n\nPANEL BUILD ERROR: Missing 'fixed_versions' object\n");
        });
    for (segment, version) in fixed {
        assert!(
            SEGMENTS.contains(&segment.as_str()),
            "\n\nPANEL BUILD ERROR: Unknown segment '{segment}' in fixed_versions\n"
        );
        assert!(
            !lengths.contains_key(segment),
            "\n\nPANEL BUILD ERROR: Segment '{segment}' has both a reference and a fixed version\n\
             A segment is either predicted or fixed, never both.\n"
        );
        assert!(
            version.as_str().is_some_and(|v| !v.is_empty()),
            "\n\nPANEL BUILD ERROR: Fixed version for '{segment}' must be a nonempty string\n"
        );
    }

    for segment in SEGMENTS {
        assert!(
            lengths.contains_key(segment) || fixed.contains_key(segment),
            "\n\nPANEL BUILD ERROR: Segment '{segment}' has neither a reference nor a fixed version\n"
        );
    }

    lengths
}

/// Returns segment name -> set of versions used by any genotype.
fn validate_compositions(path: &Path) -> HashMap<String, Vec<String>> {
    let contents = std::fs::read_to_string(path).unwrap_or_else(|e| {
        panic!(
            "\n\nCOMPOSITIONS BUILD ERROR: Failed to read file\n\
             Path: {}\n\
             Error: {e}\n",
            path.display()
        );
    });

    let mut lines = contents.lines();
    let header: Vec<&str> = lines
        .next()
        .unwrap_or_else(|| panic!("\n\nCOMPOSITIONS BUILD ERROR: File is empty\n"))
        .split('\t')
        .collect();
    assert!(
        header.first() == Some(&"Genotype"),
        "\n\nCOMPOSITIONS BUILD ERROR: First column must be 'Genotype', got {:?}\n",
        header.first()
    );
    for segment in &header[1..] {
        assert!(
            SEGMENTS.contains(segment),
            "\n\nCOMPOSITIONS BUILD ERROR: Unknown segment column '{segment}'\n"
        );
    }
    for segment in SEGMENTS {
        assert!(
            header[1..].contains(&segment),
            "\n\nCOMPOSITIONS BUILD ERROR: Missing column for segment '{segment}'\n"
        );
    }

    let mut used: HashMap<String, Vec<String>> = HashMap::new();
    let mut genotypes = Vec::new();
    for (lineno, line) in lines.enumerate() {
        let fields: Vec<&str> = line.split('\t').collect();
        assert!(
            fields.len() == header.len(),
            "\n\nCOMPOSITIONS BUILD ERROR: Line {} has {} fields, expected {}\n",
            lineno + 2,
            fields.len(),
            header.len()
        );
        assert!(
            !genotypes.contains(&fields[0].to_string()),
            "\n\nCOMPOSITIONS BUILD ERROR: Duplicate genotype '{}'\n",
            fields[0]
        );
        genotypes.push(fields[0].to_string());
        for (segment, version) in header[1..].iter().zip(&fields[1..]) {
            assert!(
                !version.is_empty(),
                "\n\nCOMPOSITIONS BUILD ERROR: Genotype '{}' has an empty version for '{segment}'\n",
                fields[0]
            );
            let versions = used.entry((*segment).to_string()).or_default();
            if !versions.contains(&(*version).to_string()) {
                versions.push((*version).to_string());
            }
        }
    }
    assert!(
        !genotypes.is_empty(),
        "\n\nCOMPOSITIONS BUILD ERROR: No genotype rows found\n"
    );

    println!(
        "cargo:warning=Validated compositions: {} genotypes, {} segment columns",
        genotypes.len(),
        header.len() - 1
    );
    used
}

fn validate_models(
    models: &serde_json::Value,
    ref_lengths: &HashMap<String, usize>,
    table_versions: &HashMap<String, Vec<String>>,
) {
    let models = models
        .get("models")
        .and_then(|m| m.as_object())
        .unwrap_or_else(|| {
            panic!("\n\nMODELS BUILD ERROR: Missing 'models' object\n");
        });

    for (segment, ref_len) in ref_lengths {
        let model = models.get(segment).unwrap_or_else(|| {
            panic!("\n\nMODELS BUILD ERROR: No model for predicted segment '{segment}'\n");
        });

        let labels: Vec<&str> = model
            .get("labels")
            .and_then(|l| l.as_array())
            .map(|l| l.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default();
        assert!(
            !labels.is_empty(),
            "\n\nMODELS BUILD ERROR: Model for '{segment}' has no labels\n"
        );

        let feature_len = model
            .get("feature_len")
            .and_then(serde_json::Value::as_u64)
            .unwrap_or_else(|| {
                panic!("\n\nMODELS BUILD ERROR: Model for '{segment}' missing 'feature_len'\n");
            });
        assert!(
            feature_len as usize == 4 * ref_len,
            "\n\nMODELS BUILD ERROR: Model for '{segment}' expects {feature_len} features, \
             but the reference encodes to {}\n",
            4 * ref_len
        );

        let bias = model
            .get("bias")
            .and_then(|b| b.as_array())
            .map(Vec::len)
            .unwrap_or(0);
        assert!(
            bias == labels.len(),
            "\n\nMODELS BUILD ERROR: Model for '{segment}' has {bias} bias terms for {} labels\n",
            labels.len()
        );

        let weights = model
            .get("weights")
            .and_then(|w| w.as_array())
            .unwrap_or_else(|| {
                panic!("\n\nMODELS BUILD ERROR: Model for '{segment}' missing 'weights' rows\n");
            });
        assert!(
            weights.len() == labels.len(),
            "\n\nMODELS BUILD ERROR: Model for '{segment}' has {} weight rows for {} labels\n",
            weights.len(),
            labels.len()
        );
        for (row, label) in weights.iter().zip(&labels) {
            for entry in row.as_array().into_iter().flatten() {
                let index = entry
                    .get(0)
                    .and_then(serde_json::Value::as_u64)
                    .unwrap_or(feature_len);
                assert!(
                    index < feature_len,
                    "\n\nMODELS BUILD ERROR: Model for '{segment}' label '{label}' has weight \
                     index {index} out of range (feature_len {feature_len})\n"
                );
            }
        }

        // Every version the table expects must be a label the model can emit.
        for version in table_versions.get(segment).into_iter().flatten() {
            assert!(
                labels.contains(&version.as_str()),
                "\n\nMODELS BUILD ERROR: Compositions use version '{version}' for '{segment}', \
                 but the model only knows {labels:?}\n"
            );
        }
    }

    println!(
        "cargo:warning=Validated models: {} segments, {} reference segments",
        models.len(),
        ref_lengths.len()
    );
}

fn set_build_dependencies() {
    // Tell cargo to rerun if bundled data changes
    println!("cargo:rerun-if-changed=data/references.json");
    println!("cargo:rerun-if-changed=data/compositions.tsv");
    println!("cargo:rerun-if-changed=data/models.json");

    // Tell cargo to rerun if build.rs changes
    println!("cargo:rerun-if-changed=build.rs");
}

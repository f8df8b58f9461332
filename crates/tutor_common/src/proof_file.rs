//! Proof file loading and structure analysis
//!
//! Proofs arrive as prose (text, Markdown, LaTeX) or as formal proof
//! scripts (Lean, Coq, Agda, Isabelle, Idris). Besides the usual metadata
//! we run a cheap heuristic pass over the content: detect the mathematical
//! domain by keyword scoring and sketch the proof structure (statement,
//! body, techniques, section headings, named lemmas). The result seeds the
//! review prompt; it is advisory, never authoritative.

use anyhow::{anyhow, Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const SUPPORTED_FORMATS: &[(&str, &str)] = &[
    (".txt", "Plain Text"),
    (".md", "Markdown"),
    (".markdown", "Markdown"),
    (".tex", "LaTeX"),
    (".latex", "LaTeX"),
    (".lean", "Lean"),
    (".lean4", "Lean 4"),
    (".v", "Coq"),
    (".agda", "Agda"),
    (".thy", "Isabelle"),
    (".idr", "Idris"),
    (".org", "Org Mode"),
    (".rst", "reStructuredText"),
];

const FORMAL_EXTENSIONS: &[&str] = &[".lean", ".lean4", ".v", ".agda", ".thy", ".idr"];

pub const MATH_DOMAINS: &[&str] = &[
    "real analysis",
    "complex analysis",
    "linear algebra",
    "abstract algebra",
    "group theory",
    "ring theory",
    "topology",
    "algebraic topology",
    "differential geometry",
    "number theory",
    "combinatorics",
    "graph theory",
    "probability",
    "statistics",
    "logic",
    "set theory",
    "category theory",
    "measure theory",
    "functional analysis",
    "discrete mathematics",
    "computer science theory",
    "algorithms",
    "computability",
    "type theory",
];

pub const PROOF_EXPERIENCE_LEVELS: &[&str] = &["student", "undergrad", "graduate", "researcher"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofMetadata {
    pub format: String,
    pub extension: String,
    pub size_bytes: usize,
    pub line_count: usize,
    pub non_empty_lines: usize,
    pub is_formal: bool,
    pub detected_domain: Option<String>,
}

/// Heuristic sketch of how the proof is put together.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProofStructure {
    pub has_theorem_statement: bool,
    pub has_proof_body: bool,
    pub proof_techniques: Vec<String>,
    pub lemmas_referenced: Vec<String>,
    pub sections: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProofFile {
    pub path: PathBuf,
    pub name: String,
    pub content: String,
    pub metadata: ProofMetadata,
    pub structure: ProofStructure,
}

fn normalized_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{}", e.to_lowercase()))
}

pub fn format_for(path: &Path) -> Option<&'static str> {
    let ext = normalized_extension(path)?;
    SUPPORTED_FORMATS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, fmt)| *fmt)
}

pub fn is_supported(path: &Path) -> bool {
    format_for(path).is_some()
}

pub fn validate_domain(domain: &str) -> bool {
    let lowered = domain.to_lowercase();
    MATH_DOMAINS.contains(&lowered.as_str())
}

pub fn validate_proof_experience_level(level: &str) -> bool {
    let lowered = level.to_lowercase();
    PROOF_EXPERIENCE_LEVELS.contains(&lowered.as_str())
}

/// Read a proof file, computing metadata and structure.
pub fn read_proof_file(path: &Path) -> Result<ProofFile> {
    if !path.exists() {
        return Err(anyhow!("File not found: {}", path.display()));
    }
    if !path.is_file() {
        return Err(anyhow!("Path is not a file: {}", path.display()));
    }

    let extension = normalized_extension(path).unwrap_or_default();
    let format = format_for(path)
        .ok_or_else(|| anyhow!("Unsupported file type: {extension}"))?;

    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    let content = String::from_utf8_lossy(&bytes).into_owned();

    let line_count = content.split('\n').count();
    let non_empty_lines = content.split('\n').filter(|l| !l.trim().is_empty()).count();

    let structure = analyze_structure(&content, format);

    Ok(ProofFile {
        path: path.to_path_buf(),
        name: path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        metadata: ProofMetadata {
            format: format.to_string(),
            extension: extension.clone(),
            size_bytes: bytes.len(),
            line_count,
            non_empty_lines,
            is_formal: FORMAL_EXTENSIONS.contains(&extension.as_str()),
            detected_domain: detect_domain(&content),
        },
        structure,
        content,
    })
}

/// Detect the mathematical domain by counting keyword hits; highest score
/// wins, ties broken by declaration order.
pub fn detect_domain(content: &str) -> Option<String> {
    let domain_keywords: &[(&str, &[&str])] = &[
        (
            "real analysis",
            &[
                "continuous",
                "limit",
                "derivative",
                "integral",
                "epsilon",
                "delta",
                "convergence",
                "sequence",
                "series",
            ],
        ),
        (
            "linear algebra",
            &[
                "matrix",
                "vector",
                "eigenvalue",
                "eigenvector",
                "linear transformation",
                "basis",
                "dimension",
                "kernel",
                "rank",
            ],
        ),
        (
            "abstract algebra",
            &[
                "group",
                "ring",
                "field",
                "homomorphism",
                "isomorphism",
                "subgroup",
                "ideal",
                "quotient",
            ],
        ),
        (
            "topology",
            &[
                "open set",
                "closed set",
                "compact",
                "connected",
                "homeomorphism",
                "neighborhood",
                "metric space",
            ],
        ),
        (
            "number theory",
            &[
                "prime",
                "divisibility",
                "congruence",
                "modular",
                "diophantine",
                "gcd",
                "lcm",
            ],
        ),
        (
            "combinatorics",
            &["permutation", "combination", "binomial", "counting", "pigeonhole"],
        ),
        (
            "graph theory",
            &["vertex", "edge", "path", "cycle", "tree", "degree", "adjacency"],
        ),
        (
            "logic",
            &[
                "implies",
                "forall",
                "exists",
                "and",
                "or",
                "not",
                "iff",
                "contradiction",
                "negation",
            ],
        ),
        (
            "set theory",
            &[
                "subset",
                "union",
                "intersection",
                "cardinality",
                "bijection",
                "injection",
                "surjection",
            ],
        ),
        (
            "probability",
            &[
                "probability",
                "random variable",
                "expected value",
                "variance",
                "distribution",
            ],
        ),
        (
            "type theory",
            &["type", "term", "judgment", "dependent type", "universe", "induction"],
        ),
    ];

    let content_lower = content.to_lowercase();
    let mut best: Option<(&str, usize)> = None;
    for (domain, keywords) in domain_keywords {
        let score = keywords
            .iter()
            .filter(|kw| content_lower.contains(*kw))
            .count();
        if score > 0 && best.map_or(true, |(_, s)| score > s) {
            best = Some((domain, score));
        }
    }
    best.map(|(domain, _)| domain.to_string())
}

fn statement_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(theorem|lemma|proposition|corollary|claim)\b").unwrap())
}

fn proof_body_res() -> &'static Vec<Regex> {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"\bproof\b",
            r"\\begin\{proof\}",
            "∎",
            r"q\.e\.d\.",
            r"qed",
        ]
        .iter()
        .map(|p| Regex::new(p).unwrap())
        .collect()
    })
}

fn technique_res() -> &'static Vec<(&'static str, Vec<Regex>)> {
    static RES: OnceLock<Vec<(&'static str, Vec<Regex>)>> = OnceLock::new();
    RES.get_or_init(|| {
        let table: &[(&str, &[&str])] = &[
            (
                "induction",
                &[
                    r"\binduction\b",
                    r"\binductive\b",
                    r"\bbase case\b",
                    r"\binductive step\b",
                ],
            ),
            (
                "contradiction",
                &[
                    r"\bcontradiction\b",
                    r"\bsuppose.*not\b",
                    r"\bassume.*false\b",
                ],
            ),
            ("contrapositive", &[r"\bcontrapositive\b"]),
            ("direct", &[r"\bdirect proof\b", r"\bdirectly\b"]),
            ("construction", &[r"\bconstruct\b", r"\bdefine\b.*to be\b"]),
            ("cases", &[r"\bcase\s+\d\b", r"\bby cases\b"]),
            ("strong induction", &[r"\bstrong induction\b"]),
            (
                "well-ordering",
                &[r"\bwell-ordering\b", r"\bwell ordering\b"],
            ),
            (
                "diagonalization",
                &[r"\bdiagonalization\b", r"\bdiagonal argument\b"],
            ),
            ("pigeonhole", &[r"\bpigeonhole\b"]),
        ];
        table
            .iter()
            .map(|(name, patterns)| {
                (
                    *name,
                    patterns.iter().map(|p| Regex::new(p).unwrap()).collect(),
                )
            })
            .collect()
    })
}

fn latex_section_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\\(?:section|subsection|subsubsection)\{([^}]+)\}").unwrap()
    })
}

fn lean_theorem_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:theorem|lemma)\s+(\w+)").unwrap())
}

fn coq_theorem_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:Theorem|Lemma|Proposition)\s+(\w+)").unwrap())
}

/// Sketch the structure of a proof.
pub fn analyze_structure(content: &str, format: &str) -> ProofStructure {
    let content_lower = content.to_lowercase();
    let mut structure = ProofStructure {
        has_theorem_statement: statement_re().is_match(&content_lower),
        has_proof_body: proof_body_res().iter().any(|re| re.is_match(&content_lower)),
        ..Default::default()
    };

    for (technique, patterns) in technique_res() {
        if patterns.iter().any(|re| re.is_match(&content_lower)) {
            structure.proof_techniques.push(technique.to_string());
        }
    }

    if format == "LaTeX" {
        structure.sections = latex_section_re()
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .collect();
    }

    if format == "Lean" || format == "Lean 4" {
        structure.lemmas_referenced = lean_theorem_re()
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .collect();
    } else if format == "Coq" {
        structure.lemmas_referenced = coq_theorem_re()
            .captures_iter(content)
            .map(|c| c[1].to_string())
            .collect();
    }

    structure
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_format_mapping() {
        assert_eq!(format_for(Path::new("p.tex")), Some("LaTeX"));
        assert_eq!(format_for(Path::new("p.lean")), Some("Lean"));
        assert_eq!(format_for(Path::new("p.exe")), None);
    }

    #[test]
    fn test_read_proof_file_marks_formal() {
        let dir = TempDir::new().unwrap();
        let lean = dir.path().join("parity.lean");
        std::fs::write(&lean, "theorem even_sq (n : Nat) : True := trivial\n").unwrap();

        let file = read_proof_file(&lean).unwrap();
        assert!(file.metadata.is_formal);
        assert_eq!(file.metadata.format, "Lean");
        assert_eq!(file.structure.lemmas_referenced, ["even_sq"]);

        let md = dir.path().join("parity.md");
        std::fs::write(&md, "# Notes\n").unwrap();
        assert!(!read_proof_file(&md).unwrap().metadata.is_formal);
    }

    #[test]
    fn test_detect_domain_picks_highest_score() {
        let content = "Let G be a group with a subgroup H. The homomorphism phi is an isomorphism.";
        assert_eq!(detect_domain(content), Some("abstract algebra".to_string()));

        // No keyword substrings at all ("lorem" would hit "or").
        assert_eq!(detect_domain("blue sky above quiet hills"), None);
    }

    #[test]
    fn test_structure_statement_and_body() {
        let content = "Theorem: every even square is even.\nProof. Let n = 2k. QED";
        let structure = analyze_structure(content, "Plain Text");
        assert!(structure.has_theorem_statement);
        assert!(structure.has_proof_body);
    }

    #[test]
    fn test_structure_techniques() {
        let content = "We proceed by induction. Base case: n = 0. Suppose not, then a contradiction arises.";
        let structure = analyze_structure(content, "Plain Text");
        assert!(structure.proof_techniques.contains(&"induction".to_string()));
        assert!(structure
            .proof_techniques
            .contains(&"contradiction".to_string()));
    }

    #[test]
    fn test_latex_sections_extracted() {
        let content = "\\section{Setup}\n\\subsection{Lemmas}\nbody";
        let structure = analyze_structure(content, "LaTeX");
        assert_eq!(structure.sections, ["Setup", "Lemmas"]);
    }

    #[test]
    fn test_validators() {
        assert!(validate_domain("Number Theory"));
        assert!(!validate_domain("astrology"));
        assert!(validate_proof_experience_level("graduate"));
        assert!(!validate_proof_experience_level("novice"));
    }
}

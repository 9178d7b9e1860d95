//! Loading proposal sets from JSON files.

use super::EditProposal;
use crate::error::{GraftError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct ProposalFile {
    proposals: Vec<EditProposal>,
}

/// Load an ordered proposal set from a JSON file.
///
/// Expected shape:
///
/// ```json
/// {
///   "proposals": [
///     {"old_snippet": "return 1", "new_snippet": "return 2"},
///     {"old_snippet": "", "new_snippet": "use std::io;\n",
///      "anchor": {"snippet": "use std::fs;\n", "placement": "after"}}
///   ]
/// }
/// ```
pub fn load_proposals_from_file(path: &Path) -> Result<Vec<EditProposal>> {
    let contents = fs::read_to_string(path).map_err(|err| GraftError::Io {
        path: path.to_path_buf(),
        source: err,
    })?;

    let file: ProposalFile =
        serde_json::from_str(&contents).map_err(|err| GraftError::InvalidProposalFile {
            message: format!("JSON parse error: {}", err),
        })?;

    if file.proposals.is_empty() {
        return Err(GraftError::InvalidProposalFile {
            message: "Proposal file must contain at least one proposal".to_string(),
        });
    }

    for (index, proposal) in file.proposals.iter().enumerate() {
        if proposal.old_snippet.is_empty() && proposal.new_snippet.is_empty() {
            return Err(GraftError::InvalidProposalFile {
                message: format!(
                    "Proposal {}: both old_snippet and new_snippet are empty",
                    index + 1
                ),
            });
        }
        if let Some(anchor) = &proposal.anchor {
            if anchor.snippet.is_empty() {
                return Err(GraftError::InvalidProposalFile {
                    message: format!("Proposal {}: anchor snippet is empty", index + 1),
                });
            }
        }
    }

    Ok(file.proposals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locate::AnchorPlacement;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_proposals(json: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(json.as_bytes())
            .expect("Failed to write proposals");
        file
    }

    #[test]
    fn test_load_replacement_and_insertion() {
        let file = write_proposals(
            r#"{"proposals": [
                {"old_snippet": "return 1", "new_snippet": "return 2",
                 "rationale": "off-by-one"},
                {"old_snippet": "", "new_snippet": "use std::io;\n",
                 "anchor": {"snippet": "use std::fs;\n", "placement": "after"}}
            ]}"#,
        );

        let proposals =
            load_proposals_from_file(file.path()).expect("Failed to load proposals");

        assert_eq!(proposals.len(), 2);
        assert_eq!(proposals[0].old_snippet, "return 1");
        assert_eq!(proposals[0].rationale.as_deref(), Some("off-by-one"));
        let anchor = proposals[1].anchor.as_ref().expect("Expected anchor");
        assert_eq!(anchor.placement, AnchorPlacement::After);
    }

    #[test]
    fn test_load_rejects_empty_set() {
        let file = write_proposals(r#"{"proposals": []}"#);
        let result = load_proposals_from_file(file.path());
        assert!(matches!(
            result,
            Err(GraftError::InvalidProposalFile { .. })
        ));
    }

    #[test]
    fn test_load_rejects_fully_empty_proposal() {
        let file = write_proposals(
            r#"{"proposals": [{"old_snippet": "", "new_snippet": ""}]}"#,
        );
        let result = load_proposals_from_file(file.path());
        match result {
            Err(GraftError::InvalidProposalFile { message }) => {
                assert!(message.contains("Proposal 1"));
            }
            other => panic!("Expected schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let file = write_proposals("not json");
        let result = load_proposals_from_file(file.path());
        assert!(matches!(
            result,
            Err(GraftError::InvalidProposalFile { .. })
        ));
    }
}

use crate::diff::FileChange;

/// Fixed instruction text that opens every review prompt.
pub fn get_review_instructions() -> String {
    include_str!("../prompt.txt").to_string()
}

/// Render the changed files of one pull request into a single review prompt.
///
/// The prompt is the instruction header followed by one block per file, in
/// the order the files were given. Deleted files get an explicit marker
/// instead of a diff body.
pub fn create_review_prompt(changes: &[FileChange]) -> String {
    let mut prompt = get_review_instructions();

    for change in changes {
        prompt.push_str(&format!(
            "\nFile: {}\nChange Type: {}\n",
            change.path, change.kind
        ));
        match &change.diff {
            Some(diff) => {
                prompt.push_str("Changed lines:\n");
                prompt.push_str(diff);
            }
            None => {
                prompt.push_str("File deleted.\n");
            }
        }
    }

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff::ChangeKind;

    #[test]
    fn prompt_starts_with_instruction_header() {
        let prompt = create_review_prompt(&[]);
        assert!(prompt.starts_with(&get_review_instructions()));
    }

    #[test]
    fn prompt_contains_one_block_per_file_in_input_order() {
        let changes = vec![
            FileChange::new("src/main.rs", ChangeKind::Edit, Some("+ foo\n".to_string())),
            FileChange::new("src/lib.rs", ChangeKind::Add, Some("+ bar\n".to_string())),
            FileChange::new("old.rs", ChangeKind::Delete, None),
        ];
        let prompt = create_review_prompt(&changes);

        assert_eq!(prompt.matches("File: ").count(), 3);

        let first = prompt.find("File: src/main.rs").unwrap();
        let second = prompt.find("File: src/lib.rs").unwrap();
        let third = prompt.find("File: old.rs").unwrap();
        assert!(first < second);
        assert!(second < third);
    }

    #[test]
    fn blocks_are_labeled_with_change_kind() {
        let changes = vec![
            FileChange::new("a.py", ChangeKind::Edit, Some("+ x = 1\n".to_string())),
            FileChange::new("b.py", ChangeKind::Delete, None),
        ];
        let prompt = create_review_prompt(&changes);

        assert!(prompt.contains("File: a.py\nChange Type: edit\n"));
        assert!(prompt.contains("File: b.py\nChange Type: delete\n"));
    }

    #[test]
    fn deleted_file_gets_marker_and_no_diff_body() {
        let changes = vec![FileChange::new("gone.rs", ChangeKind::Delete, None)];
        let prompt = create_review_prompt(&changes);

        assert!(prompt.contains("File deleted.\n"));
        assert!(!prompt.contains("Changed lines:"));
    }

    #[test]
    fn edited_file_diff_lines_appear_in_prompt() {
        let diff = "+ one\n+ two\n+ three\n";
        let changes = vec![FileChange::new("a.py", ChangeKind::Add, Some(diff.to_string()))];
        let prompt = create_review_prompt(&changes);

        assert!(prompt.contains("Changed lines:\n+ one\n+ two\n+ three\n"));
    }
}

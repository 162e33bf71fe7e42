use crate::calendar::DateKey;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

/// Time of day given to every backdated commit
const COMMIT_TIME: &str = "12:00:00";

static PREAMBLE: &[&str] = &[
    "#!/bin/bash",
    "",
    "# Check and create README.md file if it does not exist",
    "if [ ! -f README.md ]; then",
    "  echo \"# GitHub Time Travel\" > README.md",
    "  echo \"This repository was created using the GitHub Time Travel tool\" >> README.md",
    "fi",
    "",
    "# Initialize repo if not already exists",
    "# git init",
    "",
    "# Set up Git user",
    "git config user.name \"username\"",
    "git config user.email \"email@example.com\"",
    "",
    "# List of commit dates selected from dateRangePicker",
];

static LOOP_HEAD: &[&str] = &[
    "",
    "# Loop through each date and create commit",
    "for date in \"${dates[@]}\"; do",
    "  echo \"Commit for $date\" >> README.md",
    "  git add README.md",
];

static EPILOGUE: &[&str] = &[
    "done",
    "",
    "# Push commit to GitHub (replace <your-repo-url> with your repo link)",
    "git branch -M main",
    "git push -u origin main",
];

/// Renders the bash script that creates one backdated commit per date in
/// `keys`, in the given order.
///
/// The output depends on nothing but `keys`.  The git identity it configures
/// is a fixed placeholder.
pub(crate) fn generate_script(keys: &[DateKey]) -> String {
    let mut lines = PREAMBLE
        .iter()
        .map(|&s| String::from(s))
        .collect::<Vec<_>>();
    lines.push(format!("dates=({})", quoted_list(keys)));
    lines.extend(LOOP_HEAD.iter().map(|&s| String::from(s)));
    lines.push(format!("  {}", commit_command("$date")));
    lines.extend(EPILOGUE.iter().map(|&s| String::from(s)));
    let mut script = lines.join("\n");
    script.push('\n');
    script
}

/// The `git commit` invocation that backdates a commit to `date`.  `date` is
/// either a literal date or a shell expression expanding to one.
pub(crate) fn commit_command<D: fmt::Display>(date: D) -> String {
    format!(
        "GIT_COMMITTER_DATE=\"{date} {COMMIT_TIME}\" git commit --date=\"{date} {COMMIT_TIME}\" -m \"Commit on {date}\""
    )
}

fn quoted_list(keys: &[DateKey]) -> String {
    keys.iter()
        .map(|k| format!("\"{k}\""))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Writes `script` to `path` and, on Unix, marks it executable
pub(crate) fn save(path: &Path, script: &str) -> io::Result<()> {
    fs::write(path, script)?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mut perms = fs::metadata(path)?.permissions();
        perms.set_mode(perms.mode() | 0o111);
        fs::set_permissions(path, perms)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn keys(dates: &[&str]) -> Vec<DateKey> {
        dates.iter().map(|s| s.parse().unwrap()).collect()
    }

    #[test]
    fn test_full_script() {
        let script = generate_script(&keys(&["2024-06-02", "2024-05-30"]));
        assert_eq!(
            script,
            concat!(
                "#!/bin/bash\n",
                "\n",
                "# Check and create README.md file if it does not exist\n",
                "if [ ! -f README.md ]; then\n",
                "  echo \"# GitHub Time Travel\" > README.md\n",
                "  echo \"This repository was created using the GitHub Time Travel tool\" >> README.md\n",
                "fi\n",
                "\n",
                "# Initialize repo if not already exists\n",
                "# git init\n",
                "\n",
                "# Set up Git user\n",
                "git config user.name \"username\"\n",
                "git config user.email \"email@example.com\"\n",
                "\n",
                "# List of commit dates selected from dateRangePicker\n",
                "dates=(\"2024-06-02\" \"2024-05-30\")\n",
                "\n",
                "# Loop through each date and create commit\n",
                "for date in \"${dates[@]}\"; do\n",
                "  echo \"Commit for $date\" >> README.md\n",
                "  git add README.md\n",
                "  GIT_COMMITTER_DATE=\"$date 12:00:00\" git commit --date=\"$date 12:00:00\" -m \"Commit on $date\"\n",
                "done\n",
                "\n",
                "# Push commit to GitHub (replace <your-repo-url> with your repo link)\n",
                "git branch -M main\n",
                "git push -u origin main\n",
            )
        );
    }

    #[test]
    fn test_deterministic() {
        let dates = ["2024-01-03", "2023-12-31", "2024-01-01"];
        assert_eq!(generate_script(&keys(&dates)), generate_script(&keys(&dates)));
    }

    #[test]
    fn test_order_is_preserved() {
        let script = generate_script(&keys(&["2024-01-03", "2023-12-31", "2024-01-01"]));
        assert!(script.contains("dates=(\"2024-01-03\" \"2023-12-31\" \"2024-01-01\")\n"));
    }

    #[test]
    fn test_empty() {
        let script = generate_script(&[]);
        assert!(script.contains("\ndates=()\n"));
        assert!(script.contains("for date in \"${dates[@]}\"; do\n"));
    }

    #[test]
    fn test_single_date() {
        let script = generate_script(&keys(&["2024-06-02"]));
        assert!(script.contains("dates=(\"2024-06-02\")"));
        let loop_line = script
            .lines()
            .find(|ln| ln.trim_start().starts_with("GIT_COMMITTER_DATE="))
            .unwrap();
        assert_eq!(
            loop_line.trim_start().replace("$date", "2024-06-02"),
            "GIT_COMMITTER_DATE=\"2024-06-02 12:00:00\" git commit --date=\"2024-06-02 12:00:00\" -m \"Commit on 2024-06-02\""
        );
    }

    #[test]
    fn test_commit_command() {
        let key = "2024-06-02".parse::<DateKey>().unwrap();
        assert_eq!(
            commit_command(key),
            "GIT_COMMITTER_DATE=\"2024-06-02 12:00:00\" git commit --date=\"2024-06-02 12:00:00\" -m \"Commit on 2024-06-02\""
        );
    }

    #[test]
    fn test_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.sh");
        let script = generate_script(&keys(&["2024-06-02"]));
        save(&path, &script).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), script);
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mode = fs::metadata(&path).unwrap().permissions().mode();
            assert_eq!(mode & 0o111, 0o111);
        }
    }
}

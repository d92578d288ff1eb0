/// Values collected by the dialogue, one field per finished stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitData {
    pub commit_type: String,
    pub scope: String,
    pub ticket_number: String,
    pub subject: String,
    pub body: String,
    pub breaking_changes: String,
    pub footer: String,
    pub is_breaking: bool,
}

impl CommitData {
    /// Assembles the Conventional Commits message:
    ///
    /// ```text
    /// <type>[(<scope>)][!]: [<ticket> ]<subject>
    ///
    /// [<body>]
    ///
    /// [BREAKING CHANGE: <description>]
    /// [<footer>]
    /// ```
    pub fn message(&self) -> String {
        let mut header = self.commit_type.clone();
        if !self.scope.is_empty() {
            header.push('(');
            header.push_str(&self.scope);
            header.push(')');
        }
        if self.is_breaking {
            header.push('!');
        }
        header.push(':');
        if !self.ticket_number.is_empty() {
            header.push(' ');
            header.push_str(&self.ticket_number);
        }
        header.push(' ');
        header.push_str(&self.subject);

        let mut parts = vec![header];

        if !self.body.is_empty() {
            parts.push(String::new());
            parts.push(self.body.clone());
        }

        let mut footer_started = false;
        if !self.breaking_changes.is_empty() {
            parts.push(String::new());
            parts.push(format!("BREAKING CHANGE: {}", self.breaking_changes));
            footer_started = true;
        }

        if !self.footer.is_empty() {
            if !footer_started {
                parts.push(String::new());
            }
            parts.push(self.footer.clone());
        }

        parts.join("\n")
    }
}

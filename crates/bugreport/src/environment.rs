use bugreport_core::{EnvironmentProvider, EnvironmentSnapshot};

/// Environment facts for a terminal session
///
/// The "viewport" is the terminal size in character cells when the shell
/// exports it; there is no screen to measure.
pub struct HostEnvironment {
    vars: Box<dyn Fn(&str) -> Option<String>>,
}

impl Default for HostEnvironment {
    fn default() -> Self {
        Self::from_vars(|name| std::env::var(name).ok())
    }
}

impl HostEnvironment {
    pub fn from_vars(vars: impl Fn(&str) -> Option<String> + 'static) -> Self {
        Self {
            vars: Box::new(vars),
        }
    }

    fn var(&self, name: &str) -> Option<String> {
        (self.vars)(name).filter(|v| !v.trim().is_empty())
    }

    fn language(&self) -> Option<String> {
        let raw = self
            .var("LC_ALL")
            .or_else(|| self.var("LC_MESSAGES"))
            .or_else(|| self.var("LANG"))?;
        // en_US.UTF-8 -> en-US
        let tag = raw.split(['.', '@']).next().unwrap_or_default();
        match tag {
            "" | "C" | "POSIX" => None,
            tag => Some(tag.replace('_', "-")),
        }
    }

    fn terminal_size(&self) -> Option<(u32, u32)> {
        let columns = self.var("COLUMNS")?.trim().parse().ok()?;
        let lines = self.var("LINES")?.trim().parse().ok()?;
        Some((columns, lines))
    }
}

impl EnvironmentProvider for HostEnvironment {
    fn snapshot(&self) -> EnvironmentSnapshot {
        EnvironmentSnapshot {
            user_agent: Some(format!("bugreport/{}", env!("CARGO_PKG_VERSION"))),
            platform: Some(format!(
                "{}-{}",
                std::env::consts::OS,
                std::env::consts::ARCH
            )),
            language: self.language(),
            screen: None,
            viewport: self.terminal_size(),
        }
    }
}

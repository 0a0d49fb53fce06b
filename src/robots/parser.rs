//! Robots.txt parsing on top of the robotstxt crate.

use robotstxt::DefaultMatcher;

/// Parsed robots directives for one host.
///
/// Allow/disallow matching is delegated to the robotstxt matcher on demand;
/// the raw content is kept because the matcher is stateful and cheap to
/// rebuild. `Crawl-delay` is not part of the matcher API, so it is parsed by
/// hand in [`RobotsPolicy::crawl_delay`].
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    content: String,
}

impl RobotsPolicy {
    /// Wraps raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
        }
    }

    /// Checks whether `url` is allowed for `user_agent`
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.content.is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }

    /// Returns the `Crawl-delay` in seconds for `user_agent`, if any.
    ///
    /// A delay declared for the matching agent group wins over one declared
    /// for the `*` wildcard group.
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        let normalized_agent = user_agent.to_lowercase();

        let mut current_agents: Vec<String> = Vec::new();
        let mut wildcard_delay: Option<f64> = None;
        let mut agent_delay: Option<f64> = None;

        for line in self.content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let Some((key, value)) = trimmed.split_once(':') else {
                continue;
            };
            let key = key.trim().to_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    current_agents.push(value.to_lowercase());
                }
                "crawl-delay" => {
                    if let Ok(delay) = value.parse::<f64>() {
                        if current_agents
                            .iter()
                            .any(|ua| ua != "*" && normalized_agent.contains(ua.as_str()))
                        {
                            agent_delay = Some(delay);
                        } else if current_agents.iter().any(|ua| ua == "*") {
                            wildcard_delay = Some(delay);
                        }
                    }
                    // A crawl-delay ends the group; the next user-agent line
                    // starts a new one
                    current_agents.clear();
                }
                _ => {}
            }
        }

        agent_delay.or(wildcard_delay)
    }
}

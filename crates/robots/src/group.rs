//! Parses a robots.txt body into per-user-agent rule groups (C3, §4.3).

use crate::pattern::path_matches;

#[derive(Debug, Clone)]
enum Rule {
    Allow(String),
    Disallow(String),
}

/// The Allow/Disallow rules that apply to one selected user-agent group.
#[derive(Debug, Clone, Default)]
pub struct Group {
    rules: Vec<(Rule, usize)>,
}

impl Group {
    /// Longest-match wins; ties favor `Allow`. No matching rule means
    /// allowed — this mirrors the de facto robots.txt convention most
    /// crawlers use when a path is mentioned in neither direction.
    pub fn is_allowed(&self, path: &str) -> bool {
        let mut best: Option<(usize, bool)> = None;
        for (rule, len) in &self.rules {
            let (pattern, allow) = match rule {
                Rule::Allow(p) => (p, true),
                Rule::Disallow(p) => (p, false),
            };
            if !path_matches(pattern, path) {
                continue;
            }
            let better = match best {
                None => true,
                Some((best_len, best_allow)) => {
                    *len > best_len || (*len == best_len && allow && !best_allow)
                }
            };
            if better {
                best = Some((*len, allow));
            }
        }
        best.map(|(_, allow)| allow).unwrap_or(true)
    }
}

struct RawGroup {
    agents: Vec<String>,
    rules: Vec<Rule>,
}

/// Parse `body` and select the rule group for `user_agent`, falling back
/// to the `*` group when no group names it explicitly (§4.3). Returns
/// `None` if the document defines no groups at all (treated as
/// permissive by the caller).
pub fn select_group(body: &str, user_agent: &str) -> Option<Group> {
    let raw_groups = parse_groups(body);
    if raw_groups.is_empty() {
        return None;
    }

    let wanted = user_agent.to_lowercase();
    let matched = raw_groups
        .iter()
        .find(|g| g.agents.iter().any(|a| a != "*" && wanted.contains(a.as_str())))
        .or_else(|| raw_groups.iter().find(|g| g.agents.iter().any(|a| a == "*")));

    matched.map(|g| Group {
        rules: g
            .rules
            .iter()
            .map(|r| {
                let pattern = match r {
                    Rule::Allow(p) | Rule::Disallow(p) => p.clone(),
                };
                (r.clone(), pattern.len())
            })
            .collect(),
    })
}

fn parse_groups(body: &str) -> Vec<RawGroup> {
    let mut groups = Vec::new();
    let mut current_agents: Vec<String> = Vec::new();
    let mut current_rules: Vec<Rule> = Vec::new();
    let mut collecting_rules = false;

    for raw_line in body.lines() {
        let line = raw_line.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }
        let Some((key, value)) = line.split_once(':') else {
            continue;
        };
        let key = key.trim().to_lowercase();
        let value = value.trim().to_string();

        match key.as_str() {
            "user-agent" => {
                if collecting_rules {
                    groups.push(RawGroup {
                        agents: std::mem::take(&mut current_agents),
                        rules: std::mem::take(&mut current_rules),
                    });
                    collecting_rules = false;
                }
                current_agents.push(value.to_lowercase());
            }
            "disallow" => {
                collecting_rules = true;
                current_rules.push(Rule::Disallow(value));
            }
            "allow" => {
                collecting_rules = true;
                current_rules.push(Rule::Allow(value));
            }
            _ => {}
        }
    }
    if !current_agents.is_empty() {
        groups.push(RawGroup {
            agents: current_agents,
            rules: current_rules,
        });
    }
    groups
}

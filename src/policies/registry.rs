use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::action::PlayerId;
use crate::error::GameError;
use crate::policies::{GreedyPolicy, HeuristicPolicy, HumanPolicy, RandomPolicy};
use crate::policy::Policy;

/// Returns a normalized label for a policy spec (the head token before any ':').
pub fn label_for_spec(spec: &str) -> String {
    spec.split(':')
        .next()
        .unwrap_or(spec)
        .trim()
        .to_ascii_lowercase()
}

/// Create a policy instance from a CLI-style spec.
/// Supported specs:
/// - human[:name]
/// - random[:seed]
/// - greedy
/// - heuristic
pub fn create_policy_from_spec(
    spec: &str,
    id: PlayerId,
    seed: u64,
) -> Result<Box<dyn Policy>, GameError> {
    match label_for_spec(spec).as_str() {
        "human" => {
            let name = spec
                .split_once(':')
                .map(|(_, name)| name.trim().to_string());
            let name = name.unwrap_or_else(|| format!("Player {id}"));
            Ok(Box::new(HumanPolicy::new(name)))
        }
        "random" => {
            let custom_seed = match spec.split_once(':') {
                Some((_, value)) => value.trim().parse::<u64>().map_err(|_| {
                    GameError::InvalidConfiguration(format!("invalid seed in '{spec}'"))
                })?,
                None => seed ^ ((id as u64) * 0x9E37_79B9),
            };
            Ok(Box::new(RandomPolicy::new(StdRng::seed_from_u64(custom_seed))))
        }
        "greedy" => Ok(Box::new(GreedyPolicy::new())),
        "heuristic" => Ok(Box::new(HeuristicPolicy::new(id))),
        _ => Err(GameError::UnknownPolicy(spec.to_string())),
    }
}

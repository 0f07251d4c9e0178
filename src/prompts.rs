use rand::seq::SliceRandom;

pub const EXAMPLE_PROMPTS: [&str; 5] = [
    "A futuristic cityscape at sunset with flying cars and neon lights",
    "A serene mountain landscape with a crystal clear lake reflection",
    "A magical forest with glowing mushrooms and fireflies at night",
    "An astronaut exploring a colorful alien planet",
    "A cozy coffee shop interior with warm lighting and plants",
];

pub fn random_prompt() -> &'static str {
    EXAMPLE_PROMPTS
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(EXAMPLE_PROMPTS[0])
}

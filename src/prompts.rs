use crate::models::Profile;

/// System instruction for the initial plan request.
pub const PLAN_SYSTEM_PROMPT: &str = "You are a certified professional fitness coach.";

/// System instruction prepended to every follow-up exchange. Never stored
/// in the transcript.
pub const FOLLOW_UP_SYSTEM_PROMPT: &str =
    "You are a certified fitness coach. Continue helping based on the existing plan.";

/// Render a profile into the natural-language plan request.
pub fn build_plan_prompt(profile: &Profile) -> String {
    format!(
        r#"Create a complete personalized fitness plan.

User Details:
Age: {age}
Gender: {gender}
Height: {height} cm
Weight: {weight} kg
Sleep: {sleep} hours
Exercise Frequency: {exercise}
Goal: {goal}

Include:
- Weekly workout structure
- Diet suggestions
- Sleep optimization
- Safety precautions
- Practical tips"#,
        age = profile.age,
        gender = profile.gender,
        height = profile.height_cm,
        weight = profile.weight_kg,
        sleep = profile.sleep_hours,
        exercise = profile.exercise_frequency,
        goal = profile.goal,
    )
}

//! The compiled-in agent lineup

use super::AgentDescriptor;

/// Built-in agents, in display order
pub fn agents() -> Vec<AgentDescriptor> {
    vec![
        AgentDescriptor::new(
            "Study Planner",
            "Create personalized study schedules and learning plans",
            &["Education", "Planning", "Productivity"],
        ),
        AgentDescriptor::new(
            "Fitness Coach",
            "Personalized workout routines and nutrition advice",
            &["Fitness", "Health", "Coaching"],
        ),
        AgentDescriptor::new(
            "Script Writer",
            "Generate creative scripts for videos and presentations",
            &["Creativity", "Writing", "Content"],
        ),
        AgentDescriptor::new(
            "Productivity Assistant",
            "Help you manage time, tasks and increase productivity",
            &["Productivity", "Planning", "Management"],
        ),
        AgentDescriptor::new(
            "Study Tutor",
            "One-on-one tutoring for various subjects and topics",
            &["Education", "Learning", "Tutoring"],
        ),
        AgentDescriptor::new(
            "Language Coach",
            "Practice conversations and improve language skills",
            &["Language", "Learning", "Communication"],
        ),
        AgentDescriptor::new(
            "Career Advisor",
            "Get guidance on career paths, resumes, and interviews",
            &["Career", "Professional", "Advice"],
        ),
        AgentDescriptor::new(
            "Mental Wellness",
            "Support for mindfulness, meditation and mental health",
            &["Wellness", "Mental Health", "Mindfulness"],
        ),
        AgentDescriptor::new(
            "Innovation Spark",
            "Generate creative ideas and innovative solutions",
            &["Creativity", "Innovation", "Brainstorming"],
        ),
        AgentDescriptor::new(
            "Travel Planner",
            "Plan trips, itineraries and travel recommendations",
            &["Travel", "Planning", "Recommendations"],
        ),
        AgentDescriptor::new(
            "Recipe Master",
            "Generate recipes based on ingredients and preferences",
            &["Cooking", "Food", "Recipes"],
        ),
        AgentDescriptor::new(
            "Learning Path",
            "Create personalized learning journeys for any skill",
            &["Education", "Skills", "Learning"],
        ),
    ]
}

/// Role description used when talking to a real model
pub fn system_prompt(agent: &AgentDescriptor) -> String {
    if let Some(ref prompt) = agent.prompt {
        return prompt.clone();
    }

    match agent.name.as_str() {
        "Study Planner" => "You are a Study Planner AI assistant. Help users create personalized study schedules, \
                            provide learning strategies, and assist with academic planning."
            .to_string(),
        "Fitness Coach" => "You are a Fitness Coach AI assistant. Provide personalized workout routines, nutrition \
                            advice, and motivation to help users achieve their fitness goals."
            .to_string(),
        "Script Writer" => "You are a Script Writer AI assistant. Help users generate creative scripts for videos, \
                            presentations, and other content."
            .to_string(),
        _ => format!("You are a helpful {} AI assistant. {}.", agent.name, agent.description),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_names_are_unique() {
        let agents = agents();
        let names: HashSet<&str> = agents.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(agents.len(), 12);
        assert_eq!(names.len(), agents.len());
    }

    #[test]
    fn test_every_builtin_has_tags() {
        assert!(agents().iter().all(|a| !a.tags.is_empty()));
    }

    #[test]
    fn test_system_prompt_known_agent() {
        let agents = agents();
        let coach = agents.iter().find(|a| a.name == "Fitness Coach").unwrap();
        assert!(system_prompt(coach).starts_with("You are a Fitness Coach"));
    }

    #[test]
    fn test_system_prompt_fallback_and_override() {
        let mut agent = AgentDescriptor::new("Chess Mentor", "Learn openings", &[]);
        assert_eq!(
            system_prompt(&agent),
            "You are a helpful Chess Mentor AI assistant. Learn openings."
        );

        agent.prompt = Some("Custom".to_string());
        assert_eq!(system_prompt(&agent), "Custom");
    }
}

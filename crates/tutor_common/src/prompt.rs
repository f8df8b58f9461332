//! Prompt construction
//!
//! Every request to the model goes through a builder here. The builders pin
//! down the exact response grammar (the `## Section` headers) that the
//! parsers in [`crate::parse`] expect, so changes to a template and its
//! parser must move together.
//!
//! Guidance tables (experience level, question style, difficulty) fall back
//! to a sensible middle entry when given an unknown key rather than
//! failing; prompt construction is not the place to validate user input.

use crate::config::Preferences;
use crate::proof_file::ProofFile;
use crate::source_file::SourceFile;

fn experience_guidance(level: &str) -> &'static str {
    match level {
        "beginner" => {
            "This programmer is learning. Use clear language, explain concepts, \
             and focus on fundamentals. Avoid jargon unless you explain it."
        }
        "advanced" => {
            "This programmer is experienced. Focus on architecture, design patterns, \
             and deeper implications. You can reference advanced concepts."
        }
        "expert" => {
            "This programmer is highly skilled. Engage in nuanced discussions about \
             design philosophy, performance implications, and best practices."
        }
        _ => {
            "This programmer has some experience. You can discuss trade-offs and \
             introduce more advanced concepts, but provide context."
        }
    }
}

fn style_guidance(style: &str) -> &'static str {
    match style {
        "direct" => "Ask straightforward, specific questions about the code.",
        "exploratory" => "Ask open-ended questions about alternatives and trade-offs.",
        _ => "Ask questions that lead the learner to discover insights themselves.",
    }
}

/// Opening prompt of a code review: asks for clarifying questions and
/// observations in the grammar parsed by
/// [`crate::parse::parse_initial_analysis`].
pub fn initial_analysis(
    file: &SourceFile,
    experience_level: &str,
    preferences: &Preferences,
) -> String {
    let focus_areas = preferences.focus_areas.join(", ");

    format!(
        "You are a respectful, thoughtful code tutor. Your goal is to understand the programmer's code before providing feedback.\n\
         \n\
         Programmer Profile:\n\
         - Experience Level: {experience_level}\n\
         - {experience}\n\
         - Preferred Focus Areas: {focus_areas}\n\
         - Question Style: {style}\n\
         - {style_hint}\n\
         \n\
         File Information:\n\
         - Language: {language}\n\
         - Lines of Code: {line_count}\n\
         - File: {name}\n\
         \n\
         Code to Review:\n\
         ```{fence_lang}\n\
         {code}\n\
         ```\n\
         \n\
         Your task:\n\
         1. Carefully read and understand the code\n\
         2. Ask 2-4 thoughtful clarifying questions about:\n\
         \x20  - Design decisions and their rationale\n\
         \x20  - Intended use cases or constraints\n\
         \x20  - Any patterns or choices that seem intentional\n\
         \x20  - Trade-offs the programmer considered\n\
         \n\
         3. Provide brief initial observations (not criticism) about:\n\
         \x20  - Overall structure and organization\n\
         \x20  - Notable patterns or approaches used\n\
         \x20  - Areas that might benefit from discussion\n\
         \n\
         Format your response EXACTLY as follows:\n\
         \n\
         ## Questions\n\
         \n\
         1. [Your first question]\n\
         2. [Your second question]\n\
         3. [Your third question, if needed]\n\
         \n\
         ## Initial Observations\n\
         \n\
         - [Observation 1]\n\
         - [Observation 2]\n\
         - [Observation 3]\n\
         \n\
         Remember: Be respectful, assume good intentions, and focus on understanding before judging.",
        experience = experience_guidance(experience_level),
        style = preferences.question_style,
        style_hint = style_guidance(&preferences.question_style),
        language = file.metadata.language,
        line_count = file.metadata.line_count,
        name = file.name,
        fence_lang = file.metadata.language.to_lowercase(),
        code = file.content,
    )
}

/// Follow-up prompt once the user has answered the clarifying questions.
/// Empty answers are skipped.
pub fn feedback(answers: &[String], experience_level: &str, preferences: &Preferences) -> String {
    let answers_text = answers
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.trim().is_empty())
        .map(|(i, a)| format!("Answer {}: {}", i + 1, a))
        .collect::<Vec<_>>()
        .join("\n\n");

    let focus_areas = if preferences.focus_areas.is_empty() {
        "general".to_string()
    } else {
        preferences.focus_areas.join(", ")
    };

    format!(
        "Thank you for those answers. Now that I understand your intentions and reasoning, let me provide constructive feedback.\n\
         \n\
         User's Answers:\n\
         {answers_text}\n\
         \n\
         Based on the programmer's experience level ({experience_level}) and their explanations, please provide:\n\
         \n\
         1. **Positive Feedback**: What's working well? What shows good understanding or thoughtful decisions?\n\
         \n\
         2. **Suggestions for Improvement**: Concrete, actionable suggestions that:\n\
         \x20  - Respect the programmer's existing style and intentions\n\
         \x20  - Align with their experience level\n\
         \x20  - Include brief explanations of WHY the suggestion helps\n\
         \x20  - Provide examples when helpful\n\
         \n\
         3. **Learning Opportunities**: Concepts, patterns, or techniques worth exploring further\n\
         \n\
         4. **Trade-offs Discussion**: Any interesting trade-offs in their current approach\n\
         \n\
         Format your response clearly with these sections. Be encouraging and educational, not critical.\n\
         Remember their focus areas: {focus_areas}.\n\
         \n\
         Keep your feedback concise but meaningful. For a {experience_level} programmer, adjust your explanations accordingly."
    )
}

fn proof_experience_guidance(level: &str) -> &'static str {
    match level {
        "student" => {
            "This person is learning to write proofs for the first time. \
             Use clear language, explain proof techniques, and focus on logical structure. \
             Be encouraging and patient with basic mistakes."
        }
        "graduate" => {
            "This person is a graduate student. You can discuss sophisticated proof strategies, \
             reference advanced theorems, and engage in nuanced discussions about rigor."
        }
        "researcher" => {
            "This person is an experienced mathematician. Engage at a professional level, \
             discuss subtle points of rigor, and don't shy away from technical details."
        }
        _ => {
            "This person is an undergraduate math student. They understand basic proof techniques \
             but may struggle with more advanced concepts. Provide context for terminology."
        }
    }
}

/// Opening prompt of a proof review. The response grammar adds a
/// `## Main Claim` section ahead of questions and observations.
pub fn proof_initial_analysis(
    file: &ProofFile,
    experience_level: &str,
    domain: Option<&str>,
) -> String {
    let domain_context = match (domain, &file.metadata.detected_domain) {
        (Some(d), _) => format!("\nMathematical Domain: {d}"),
        (None, Some(d)) => format!("\nDetected Domain: {d} (auto-detected from content)"),
        (None, None) => String::new(),
    };

    let techniques = if file.structure.proof_techniques.is_empty() {
        "Not detected".to_string()
    } else {
        file.structure.proof_techniques.join(", ")
    };

    let format_specific = if file.metadata.is_formal {
        "\nNote: This is a formal proof in a proof assistant. Pay attention to:\n\
         - Type correctness and universe levels\n\
         - Proper use of tactics\n\
         - Completeness of the proof term\n\
         - Idiomatic use of the proof assistant's features"
    } else {
        ""
    };

    format!(
        "You are a thoughtful, respectful mathematics tutor reviewing a proof. Your goal is to understand the proof's intent and approach before providing feedback.\n\
         \n\
         Reviewer Profile:\n\
         - Experience Level: {experience_level}\n\
         - {experience}{domain_context}\n\
         \n\
         Proof Information:\n\
         - Format: {format}\n\
         - Lines: {line_count}\n\
         - Has theorem statement: {has_statement}\n\
         - Has proof body: {has_body}\n\
         - Detected techniques: {techniques}{format_specific}\n\
         \n\
         Proof to Review:\n\
         ---\n\
         {content}\n\
         ---\n\
         \n\
         Your task:\n\
         1. Carefully read and understand the proof\n\
         2. Identify the main claim being proved\n\
         3. Trace the logical flow of the argument\n\
         4. Ask 2-4 thoughtful clarifying questions about:\n\
         \x20  - The proof strategy and why it was chosen\n\
         \x20  - Any steps that seem unclear or might benefit from more detail\n\
         \x20  - Assumptions being made (stated or unstated)\n\
         \x20  - The intended level of rigor\n\
         \n\
         5. Provide brief initial observations (not criticism yet) about:\n\
         \x20  - The overall structure and approach\n\
         \x20  - Proof techniques being employed\n\
         \x20  - Areas that might benefit from discussion\n\
         \n\
         Format your response EXACTLY as follows:\n\
         \n\
         ## Main Claim\n\
         [One sentence describing what is being proved]\n\
         \n\
         ## Questions\n\
         \n\
         1. [Your first question about the proof]\n\
         2. [Your second question]\n\
         3. [Your third question, if needed]\n\
         \n\
         ## Initial Observations\n\
         \n\
         - [Observation 1]\n\
         - [Observation 2]\n\
         - [Observation 3]\n\
         \n\
         Remember: Be respectful, assume the writer has good mathematical intuition, and focus on understanding their approach before judging its correctness or rigor.",
        experience = proof_experience_guidance(experience_level),
        format = file.metadata.format,
        line_count = file.metadata.line_count,
        has_statement = file.structure.has_theorem_statement,
        has_body = file.structure.has_proof_body,
        content = file.content,
    )
}

/// Follow-up prompt for proof feedback once the questions are answered.
pub fn proof_feedback(answers: &[String], experience_level: &str) -> String {
    let answers_text = answers
        .iter()
        .enumerate()
        .filter(|(_, a)| !a.trim().is_empty())
        .map(|(i, a)| format!("Answer {}: {}", i + 1, a))
        .collect::<Vec<_>>()
        .join("\n\n");

    let closing = if experience_level == "student" || experience_level == "undergrad" {
        "more explanation of fundamentals"
    } else {
        "engagement with subtle points of rigor"
    };

    format!(
        "Thank you for those answers. Now that I understand your proof strategy and intentions, let me provide constructive feedback.\n\
         \n\
         User's Answers:\n\
         {answers_text}\n\
         \n\
         Based on the mathematician's experience level ({experience_level}) and their explanations, please provide:\n\
         \n\
         1. **Logical Correctness**: Evaluate the logical validity of the proof\n\
         \x20  - Are all steps justified?\n\
         \x20  - Are there any gaps in reasoning?\n\
         \x20  - Are the assumptions valid and clearly stated?\n\
         \n\
         2. **Rigor Assessment**: Comment on the level of rigor\n\
         \x20  - Is the proof sufficiently rigorous for its intended audience?\n\
         \x20  - Are there implicit assumptions that should be made explicit?\n\
         \x20  - Are edge cases or special cases handled?\n\
         \n\
         3. **Positive Feedback**: What's working well in this proof?\n\
         \x20  - Good use of proof techniques\n\
         \x20  - Clear exposition\n\
         \x20  - Elegant steps or insights\n\
         \n\
         4. **Suggestions for Improvement**: Concrete, actionable suggestions that:\n\
         \x20  - Respect the proof's existing approach\n\
         \x20  - Are appropriate for the experience level\n\
         \x20  - Include brief explanations of WHY the suggestion helps\n\
         \x20  - Provide specific examples when helpful\n\
         \n\
         5. **Learning Opportunities**:\n\
         \x20  - Related theorems or techniques worth exploring\n\
         \x20  - Ways to strengthen or generalize the result\n\
         \x20  - Common pitfalls in this type of proof\n\
         \n\
         Format your response clearly with these sections. Be encouraging and educational.\n\
         Remember: A {experience_level} might need {closing}."
    )
}

fn exercise_type_instructions(exercise_type: &str) -> &'static str {
    match exercise_type {
        "fill_in_blank" => {
            "\nCreate a code template with strategic blanks (marked with TODO comments) that the learner must fill in.\n\
             The blanks should test understanding of key concepts.\n\
             Include clear comments explaining what each blank should accomplish."
        }
        "bug_fix" => {
            "\nCreate code that contains intentional bugs related to the topic.\n\
             The bugs should be instructive - common mistakes that teach important concepts.\n\
             Include a comment at the top explaining what the code SHOULD do.\n\
             Don't make the bugs obvious - they should require thinking."
        }
        "refactoring" => {
            "\nProvide working but poorly structured code that accomplishes a task.\n\
             Issues might include: code duplication, poor naming, overly complex logic,\n\
             missing abstractions, or other code smells.\n\
             The learner should refactor while preserving functionality."
        }
        "test_writing" => {
            "\nProvide a complete implementation of a function/class.\n\
             The learner must write comprehensive tests that cover:\n\
             - Normal cases\n\
             - Edge cases\n\
             - Error conditions\n\
             Include a testing framework import appropriate for the language."
        }
        _ => {
            "\nProvide a function/class signature with detailed docstrings explaining:\n\
             - What the function should do\n\
             - Input parameters and their types\n\
             - Expected return value and type\n\
             - Example inputs and outputs\n\
             The learner implements the entire body from scratch."
        }
    }
}

fn difficulty_guidance(difficulty: &str) -> &'static str {
    match difficulty {
        "beginner" => "Use simple concepts, short code, and clear patterns. Focus on fundamentals.",
        "advanced" => {
            "Include complex scenarios, performance considerations, and subtle edge cases."
        }
        "expert" => {
            "Challenge with nuanced problems, architectural decisions, and optimization opportunities."
        }
        _ => "Include moderate complexity, common patterns, and some edge cases to consider.",
    }
}

/// Exercise-generation prompt; grammar parsed by
/// [`crate::parse::parse_exercise`].
pub fn generate_exercise(
    topic: &str,
    language: &str,
    exercise_type: &str,
    difficulty: &str,
    experience_level: &str,
) -> String {
    format!(
        "You are an expert programming instructor creating a practice exercise.\n\
         \n\
         Topic: {topic}\n\
         Language: {language}\n\
         Exercise Type: {exercise_type}\n\
         Difficulty: {difficulty}\n\
         Learner Level: {experience_level}\n\
         \n\
         Difficulty Guidance: {guidance}\n\
         \n\
         Exercise Type Instructions:{instructions}\n\
         \n\
         Generate a complete exercise with the following format:\n\
         \n\
         ## Instructions\n\
         [Clear, detailed instructions for what the learner should do. Be specific about requirements and constraints. 2-4 paragraphs.]\n\
         \n\
         ## Learning Objectives\n\
         - [Objective 1 - what concept will they understand?]\n\
         - [Objective 2]\n\
         - [Objective 3]\n\
         \n\
         ## Starter Code\n\
         ```{fence_lang}\n\
         [The code template/buggy code/signature that the learner will work with]\n\
         ```\n\
         \n\
         ## Test Code\n\
         ```{fence_lang}\n\
         [Optional but recommended: test cases the learner can run to verify their solution]\n\
         ```\n\
         \n\
         ## Hints\n\
         1. [First hint - gentle nudge in the right direction]\n\
         2. [Second hint - more specific guidance]\n\
         3. [Third hint - nearly gives away the approach but not the answer]\n\
         \n\
         ## Solution Explanation\n\
         [Brief explanation of what the correct solution looks like and why - this will be hidden from the learner]\n\
         \n\
         Remember:\n\
         - Make the exercise practical and relevant\n\
         - The starter code should be 15-50 lines depending on complexity\n\
         - Hints should progressively reveal more without giving away the answer\n\
         - Test code should be runnable if the learner has the standard testing framework",
        guidance = difficulty_guidance(difficulty),
        instructions = exercise_type_instructions(exercise_type),
        fence_lang = language.to_lowercase(),
    )
}

/// Submission-review prompt; grammar parsed by
/// [`crate::parse::parse_submission_review`].
pub fn review_submission(
    topic: &str,
    exercise_type: &str,
    learning_objectives: &[String],
    submitted_code: &str,
    language: &str,
    experience_level: &str,
) -> String {
    let objectives = learning_objectives
        .iter()
        .map(|o| format!("- {o}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are reviewing a coding exercise submission from a {experience_level} programmer.\n\
         \n\
         Exercise Topic: {topic}\n\
         Exercise Type: {exercise_type}\n\
         Learning Objectives:\n\
         {objectives}\n\
         \n\
         Submitted Code:\n\
         ```{fence_lang}\n\
         {submitted_code}\n\
         ```\n\
         \n\
         Please provide a constructive review:\n\
         \n\
         ## Correctness\n\
         [Does the solution correctly address the exercise requirements? Are there any bugs or issues?]\n\
         \n\
         ## Code Quality\n\
         [Comment on style, readability, naming, and organization]\n\
         \n\
         ## Understanding Demonstrated\n\
         [Based on the solution, what concepts does the learner seem to understand well? What might need more practice?]\n\
         \n\
         ## Suggestions\n\
         [Specific, actionable suggestions for improvement]\n\
         \n\
         ## Overall Assessment\n\
         [NEEDS_WORK / ACCEPTABLE / GOOD / EXCELLENT]\n\
         [Brief summary of the submission quality]\n\
         \n\
         Be encouraging but honest. Focus on learning and improvement.",
        fence_lang = language.to_lowercase(),
    )
}

/// Difficulty ramp for flawed-code rounds.
pub fn code_round_difficulty(round_number: u32) -> &'static str {
    if round_number == 1 {
        "obvious but instructive"
    } else if round_number <= 3 {
        "subtle and thought-provoking"
    } else {
        "nuanced and requiring deep understanding"
    }
}

/// Difficulty ramp for flawed-proof rounds; shorter middle step than the
/// code ramp.
pub fn proof_round_difficulty(round_number: u32) -> &'static str {
    if round_number == 1 {
        "obvious but instructive"
    } else if round_number <= 3 {
        "subtle"
    } else {
        "very subtle and requiring careful attention"
    }
}

/// Flawed-code generation prompt; grammar parsed by
/// [`crate::parse::parse_code_round`].
pub fn flawed_code(
    topic: &str,
    language: &str,
    experience_level: &str,
    round_number: u32,
) -> String {
    let difficulty = code_round_difficulty(round_number);

    format!(
        "You are roleplaying as a {experience_level} programmer student who needs help with {topic}.\n\
         \n\
         Your task: Create a SHORT code example in {language} (5-15 lines) that demonstrates a {difficulty} mistake related to {topic}.\n\
         \n\
         The mistake should be:\n\
         1. Instructive - teaches an important concept\n\
         2. Clever - not immediately obvious\n\
         3. Realistic - something a real programmer might do\n\
         4. Focused - demonstrates ONE specific misconception\n\
         \n\
         Format your response as:\n\
         ## Code\n\
         ```{fence_lang}\n\
         [your flawed code here]\n\
         ```\n\
         \n\
         ## Student Question\n\
         [Write a short, authentic message from the student perspective. Include:\n\
         - What they were trying to accomplish\n\
         - What happened when they ran it (error message, unexpected output, or weird behavior)\n\
         - A specific question asking for help\n\
         Example: \"I tried running this code to X, but I got this error: [error message]. Can you help me understand what's going wrong?\"]\n\
         \n\
         ## Hidden Issues\n\
         [Bullet list of what's wrong - this is for your internal tracking]\n\
         - Issue 1\n\
         - Issue 2\n\
         \n\
         Remember: Make the student question authentic and include helpful hints like error messages or unexpected behavior!",
        fence_lang = language.to_lowercase(),
    )
}

/// Evaluation prompt for the user's hints on a flawed-code round; grammar
/// parsed by [`crate::parse::parse_evaluation`].
pub fn evaluate_hints(
    topic: &str,
    code: &str,
    expected_issues: &[String],
    user_explanation: &str,
    experience_level: &str,
    language: &str,
) -> String {
    let issues = expected_issues
        .iter()
        .map(|i| format!("- {i}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are roleplaying as a {experience_level} programmer student learning about {topic}. The user is acting as your teacher.\n\
         \n\
         You showed this code:\n\
         ```{fence_lang}\n\
         {code}\n\
         ```\n\
         \n\
         Known issues in the code:\n\
         {issues}\n\
         \n\
         Teacher's hints/guidance:\n\
         \"{user_explanation}\"\n\
         \n\
         Evaluate the teacher's hints:\n\
         1. Did they give helpful hints without revealing the full answer?\n\
         2. Were the hints specific enough to guide you toward the solution?\n\
         3. Did they ask good guiding questions that promote discovery?\n\
         4. How well did they balance between being helpful and letting you learn?\n\
         \n\
         Respond as the student, staying in character:\n\
         \n\
         ## Student Response\n\
         [React to their hints. If the hints were good, show you're getting closer to understanding. If they directly gave the answer, acknowledge you got it but note it would have been better to discover it yourself. If hints were too vague, ask for clarification.]\n\
         \n\
         ## Teaching Quality Assessment\n\
         [Brief internal note on teaching quality: Were the hints appropriately scaffolded? Did they promote active learning?]\n\
         \n\
         ## Understanding Achieved\n\
         [YES if the student has reached understanding through good hints, NO if more scaffolding is needed]",
        fence_lang = language.to_lowercase(),
    )
}

/// Flawed-proof generation prompt; grammar parsed by
/// [`crate::parse::parse_proof_round`].
pub fn flawed_proof(
    topic: &str,
    domain: &str,
    experience_level: &str,
    round_number: u32,
) -> String {
    let difficulty = proof_round_difficulty(round_number);

    format!(
        "You are creating a teaching exercise about mathematical proofs.\n\
         \n\
         Create a SHORT proof (5-15 lines) related to {topic} in {domain} that contains a {difficulty} error.\n\
         \n\
         The error should be:\n\
         1. Instructive - teaches an important concept about proof writing\n\
         2. Realistic - a mistake a real student might make\n\
         3. Not trivial - requires thought to identify\n\
         \n\
         For a {experience_level} level mathematician, adjust the sophistication accordingly.\n\
         \n\
         Format your response as:\n\
         \n\
         ## Theorem\n\
         [State the theorem or claim being \"proved\"]\n\
         \n\
         ## Flawed Proof\n\
         [The proof with the intentional error(s)]\n\
         \n\
         ## Hidden Issues\n\
         [List what's actually wrong - for internal tracking only]\n\
         - Issue 1: [description]\n\
         - Issue 2: [if applicable]"
    )
}

/// Evaluation prompt for the user's analysis of a flawed proof; grammar
/// parsed by [`crate::parse::parse_evaluation`].
pub fn evaluate_proof_analysis(
    proof: &str,
    expected_issues: &[String],
    user_analysis: &str,
    experience_level: &str,
) -> String {
    let issues = expected_issues
        .iter()
        .map(|i| format!("- {i}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Evaluate this student's analysis of a flawed proof.\n\
         \n\
         The flawed proof:\n\
         {proof}\n\
         \n\
         Known issues:\n\
         {issues}\n\
         \n\
         Student's analysis:\n\
         \"{user_analysis}\"\n\
         \n\
         As a {experience_level} level student, evaluate:\n\
         1. Did they identify the main error(s)?\n\
         2. Is their explanation mathematically sound?\n\
         3. Did they explain WHY it's an error?\n\
         \n\
         Respond with:\n\
         \n\
         ## Feedback\n\
         [Constructive feedback on their analysis. If they missed something, guide them toward it without giving it away entirely. If they got it, confirm and expand on the insight.]\n\
         \n\
         ## Understanding Achieved\n\
         [YES if they identified the key issue(s), NO if they need more guidance]"
    )
}

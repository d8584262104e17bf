//! services/api/src/adapters/prompts.rs
//!
//! The prompt templates behind the interview gateway, organized as a strategy
//! table keyed by the closed `InterviewType` set. Each entry is a pure
//! function from context to prompt text, so supporting a new interview style
//! is a data addition rather than a control-flow change.

use interview_core::domain::{
    Difficulty, Domain, EvaluationRequest, InterviewType, SampleAnswerRequest, SessionConfig,
};

/// The per-type template bundle. Several interview styles share a template
/// where the wording only differs by the style's label.
struct PromptSet {
    scenario: fn(&SessionConfig) -> String,
    first_question: fn(InterviewType, &str) -> String,
    evaluation_focus: fn(InterviewType) -> String,
    sample_instruction: &'static str,
}

const PROMPTS: [(InterviewType, PromptSet); 10] = [
    (
        InterviewType::CaseStudy,
        PromptSet {
            scenario: case_study_scenario,
            first_question: case_study_first_question,
            evaluation_focus: case_study_focus,
            sample_instruction: "Reference relevant business analysis frameworks or principles (like those in BABOK) where appropriate. The answer should be structured and logical.",
        },
    ),
    (
        InterviewType::ProductManagement,
        PromptSet {
            scenario: process_scenario,
            first_question: process_first_question,
            evaluation_focus: process_focus,
            sample_instruction: DEFAULT_SAMPLE_INSTRUCTION,
        },
    ),
    (
        InterviewType::RequirementGathering,
        PromptSet {
            scenario: process_scenario,
            first_question: process_first_question,
            evaluation_focus: process_focus,
            sample_instruction: DEFAULT_SAMPLE_INSTRUCTION,
        },
    ),
    (
        InterviewType::SystemDesign,
        PromptSet {
            scenario: system_design_scenario,
            first_question: system_design_first_question,
            evaluation_focus: system_design_focus,
            sample_instruction: DEFAULT_SAMPLE_INSTRUCTION,
        },
    ),
    (
        InterviewType::DataStructuresAlgorithms,
        PromptSet {
            scenario: dsa_scenario,
            first_question: dsa_first_question,
            evaluation_focus: dsa_focus,
            sample_instruction: DEFAULT_SAMPLE_INSTRUCTION,
        },
    ),
    (
        InterviewType::TechnicalQuestions,
        PromptSet {
            scenario: technical_scenario,
            first_question: technical_first_question,
            evaluation_focus: technical_focus,
            sample_instruction: "Provide a technically accurate and well-explained answer. If code is required, ensure it is correct and formatted properly.",
        },
    ),
    (
        InterviewType::AgileScrum,
        PromptSet {
            scenario: agile_scenario,
            first_question: agile_first_question,
            evaluation_focus: agile_focus,
            sample_instruction: DEFAULT_SAMPLE_INSTRUCTION,
        },
    ),
    (
        InterviewType::UserAcceptanceTesting,
        PromptSet {
            scenario: process_scenario,
            first_question: process_first_question,
            evaluation_focus: process_focus,
            sample_instruction: DEFAULT_SAMPLE_INSTRUCTION,
        },
    ),
    (
        InterviewType::BehavioralQuestions,
        PromptSet {
            scenario: behavioral_scenario,
            first_question: behavioral_first_question,
            evaluation_focus: behavioral_focus,
            sample_instruction: "Structure the answer using the STAR (Situation, Task, Action, Result) method.",
        },
    ),
    (
        InterviewType::SituationalJudgement,
        PromptSet {
            scenario: situational_scenario,
            first_question: situational_first_question,
            evaluation_focus: situational_focus,
            sample_instruction: DEFAULT_SAMPLE_INSTRUCTION,
        },
    ),
];

const DEFAULT_SAMPLE_INSTRUCTION: &str =
    "Provide a clear, concise, and professional answer that directly addresses all parts of the question.";

fn prompt_set(interview_type: InterviewType) -> &'static PromptSet {
    // The table covers the closed enum exhaustively; a miss is unreachable.
    PROMPTS
        .iter()
        .find(|(t, _)| *t == interview_type)
        .map(|(_, set)| set)
        .unwrap_or(&PROMPTS[0].1)
}

//=========================================================================================
// Public prompt builders
//=========================================================================================

/// Builds the scenario-generation prompt for the configured interview type
/// and difficulty tier.
pub fn scenario_prompt(config: &SessionConfig) -> String {
    (prompt_set(config.interview_type).scenario)(config)
}

/// Builds the first-question prompt for a freshly generated scenario.
pub fn first_question_prompt(interview_type: InterviewType, scenario: &str) -> String {
    (prompt_set(interview_type).first_question)(interview_type, scenario)
}

/// Builds the evaluation prompt: shared base instructions, the type-specific
/// evaluation focus, and the strict response-shape rules.
pub fn evaluation_prompt(request: &EvaluationRequest) -> String {
    let config = &request.config;
    let base = format!(
        r#"You are an expert interviewer simulating an interview.
Your role is to evaluate the candidate's answer and ask a relevant follow-up question.

**Interview Details:**
- **Interview Type:** {interview_type}
- **Difficulty:** {difficulty}
- **Domain:** {domain}
- **Company:** {company}
- **Job Description:** {job_description}
- **Scenario/Context:** {scenario}
- **Current Turn:** {turn_number} of {max_turns}
- **Conversation History:**
{history}

**Candidate's Latest Answer to be Evaluated:**
"{answer}"

**Your Tasks:**
1. **Evaluate the answer:** Assess the candidate's response based on the principles of the **{interview_type}** interview type. If a company or job description was provided, factor that into your evaluation.
2. **Provide feedback:** Write brief (1-2 sentences), constructive feedback.
3. **Decide the next step:**
   - If the turn limit ({max_turns}) is reached, the interview MUST end. Set 'isGameOver' to true.
   - Otherwise, formulate a logical follow-up question that digs deeper or explores a new facet of the topic.
4. **Generate Final Feedback (if game is over):** If 'isGameOver' is true, provide a comprehensive final feedback summary (3-5 sentences) of the candidate's performance.
5. **Format your response:** You MUST respond with a single JSON object."#,
        interview_type = config.interview_type,
        difficulty = config.difficulty,
        domain = config.domain,
        company = config.company_name.as_deref().unwrap_or("Not specified"),
        job_description = config.job_description.as_deref().unwrap_or("Not provided"),
        scenario = request.scenario,
        turn_number = request.turn_number,
        max_turns = request.max_turns,
        history = request.history,
        answer = request.answer,
    );

    let focus = (prompt_set(config.interview_type).evaluation_focus)(config.interview_type);

    format!(
        r#"{base}

{focus}

**Required JSON shape (all fields present, strings never null):**
{{"feedback": string, "nextQuestion": string, "nextQuestionCategory": string, "isGameOver": boolean, "finalFeedback": string}}

- 'nextQuestion' and 'nextQuestionCategory' MUST be empty strings if 'isGameOver' is true.
- 'finalFeedback' MUST be an empty string if 'isGameOver' is false.
- Output ONLY the JSON object, with no surrounding prose or code fences."#
    )
}

/// Builds the sample-answer prompt for the side-channel.
pub fn sample_answer_prompt(request: &SampleAnswerRequest) -> String {
    let config = &request.config;
    let instruction = prompt_set(config.interview_type).sample_instruction;
    format!(
        r#"You are an expert candidate in an interview.
Your task is to provide an ideal, well-structured sample answer to the interviewer's question.

**Interview Context:**
- **Type:** {interview_type}
- **Company:** {company}
- **Job Description Context:** {job_description}
- **Scenario:** {scenario}
- **Conversation History:**
{history}

**Current Question to Answer:**
"{question}"

**Instructions:**
1. Craft a high-quality answer from the perspective of a top-tier candidate.
2. {instruction}
3. The answer should demonstrate strong analytical and communication skills.
4. If a company or job description is provided, tailor the answer to reflect that context.
5. Provide ONLY the answer text, without any introductions like "Here is a sample answer:"."#,
        interview_type = config.interview_type,
        company = config.company_name.as_deref().unwrap_or("Not specified"),
        job_description = config.job_description.as_deref().unwrap_or("Not provided"),
        scenario = request.scenario,
        history = request.history,
        question = request.current_question,
    )
}

//=========================================================================================
// Shared fragments
//=========================================================================================

fn domain_instruction(domain: Domain) -> String {
    match domain {
        Domain::General => {
            "The scenario should be general and not specific to any industry.".to_string()
        }
        other => format!(
            "The scenario should be set in the {other} industry. Make sure the context is relevant to that domain."
        ),
    }
}

fn customization_instruction(config: &SessionConfig) -> String {
    if config.company_name.is_none() && config.job_description.is_none() {
        return String::new();
    }
    format!(
        "Further customize this for a job interview at \"{}\". The provided job description is: \"{}\". The scenario should align with the potential challenges or projects this role might face.",
        config.company_name.as_deref().unwrap_or("an unspecified company"),
        config.job_description.as_deref().unwrap_or("not provided"),
    )
}

fn difficulty_tiers(difficulty: Difficulty, easy: &str, medium: &str, hard: &str) -> String {
    let tier = match difficulty {
        Difficulty::Easy => easy,
        Difficulty::Medium => medium,
        Difficulty::Hard => hard,
    };
    format!("- For '{difficulty}' difficulty, {tier}")
}

//=========================================================================================
// Scenario templates
//=========================================================================================

fn case_study_scenario(config: &SessionConfig) -> String {
    format!(
        r#"You are an expert interviewer for a Business Analyst position, and your methods are grounded in the BABOK (Business Analysis Body of Knowledge) Guide.
Generate a concise and engaging case study scenario for a job interview. The scenario should allow a candidate to demonstrate skills across multiple BABOK Knowledge Areas.

The difficulty of the scenario should be: {difficulty}.
{domain}
{customization}

{tier}

Provide ONLY the scenario description, without any questions or introductions."#,
        difficulty = config.difficulty,
        domain = domain_instruction(config.domain),
        customization = customization_instruction(config),
        tier = difficulty_tiers(
            config.difficulty,
            "create a well-defined problem.",
            "introduce some ambiguity or conflicting needs.",
            "present a complex, ill-defined business problem.",
        ),
    )
}

fn process_scenario(config: &SessionConfig) -> String {
    format!(
        r#"You are an expert interviewer for a Business Analyst position.
Generate a very brief (2-3 sentences) scenario to set the stage for an interview focused on **{interview_type}**.
The difficulty of the scenario should be: {difficulty}.
{domain}
{customization}
Provide ONLY the scenario description."#,
        interview_type = config.interview_type,
        difficulty = config.difficulty,
        domain = domain_instruction(config.domain),
        customization = customization_instruction(config),
    )
}

fn technical_scenario(config: &SessionConfig) -> String {
    format!(
        r#"You are an expert interviewer for a Business Analyst position.
Generate a very brief (2-3 sentences) technical context for an interview focused on **Technical Skills**.
The context should set up a scenario where a technical question (like SQL, API design, or data mapping) would be relevant.
The difficulty of the scenario should be: {difficulty}.
{domain}
{customization}
Example: "Our e-commerce platform needs to integrate with a new third-party shipping provider. We have their API documentation."
Provide ONLY the context."#,
        difficulty = config.difficulty,
        domain = domain_instruction(config.domain),
        customization = customization_instruction(config),
    )
}

fn situational_scenario(config: &SessionConfig) -> String {
    format!(
        r#"You are an expert interviewer for a Business Analyst position.
Generate a brief (2-3 sentences) but challenging workplace scenario for a **Situational Judgement Test**.
The scenario should present a dilemma involving conflicting priorities, difficult stakeholders, or ethical ambiguity that a Business Analyst might face.
The difficulty of the scenario should be: {difficulty}.
{domain}
{customization}
Example: "During user testing for a new feature, a senior director insists on a last-minute change that is outside the project's scope and will delay the launch. The development team says it's not feasible."
Provide ONLY the scenario."#,
        difficulty = config.difficulty,
        domain = domain_instruction(config.domain),
        customization = customization_instruction(config),
    )
}

fn system_design_scenario(config: &SessionConfig) -> String {
    format!(
        r#"You are an expert interviewer for a senior software development or architect position.
Generate a concise, single-paragraph system design problem.
The difficulty of the problem should be: {difficulty}.
{domain}
{customization}
{tier}
Provide ONLY the problem statement.
Example: "Design a URL shortening service like TinyURL that can handle millions of requests per day.""#,
        difficulty = config.difficulty,
        domain = domain_instruction(config.domain),
        customization = customization_instruction(config),
        tier = difficulty_tiers(
            config.difficulty,
            "describe a simple, well-known service (e.g., a pastebin service).",
            "introduce a requirement for scale or a specific feature (e.g., a real-time chat application).",
            "present a complex system with multiple components and high throughput requirements (e.g., a ride-sharing service, or a video streaming platform).",
        ),
    )
}

fn dsa_scenario(config: &SessionConfig) -> String {
    format!(
        r#"You are an expert technical interviewer.
Generate a single, clear Data Structures & Algorithms (DSA) problem statement suitable for a software engineering interview.
The difficulty of the problem should be: {difficulty}.
{domain}
{customization}
{tier}
Provide ONLY the problem statement.
Example: "Given an array of integers nums and an integer target, return indices of the two numbers such that they add up to target.""#,
        difficulty = config.difficulty,
        domain = domain_instruction(config.domain),
        customization = customization_instruction(config),
        tier = difficulty_tiers(
            config.difficulty,
            "choose a common problem involving arrays, strings, or hashmaps (e.g., Two Sum, Valid Parentheses).",
            "choose a problem involving trees, graphs, or dynamic programming (e.g., Level Order Traversal, Coin Change).",
            "choose a complex problem involving advanced algorithms or data structures (e.g., Sliding Window Maximum, a hard graph problem).",
        ),
    )
}

fn agile_scenario(config: &SessionConfig) -> String {
    format!(
        r#"You are an expert Agile coach interviewing a Business Analyst or Scrum Master.
Generate a brief (2-3 sentences) scenario describing a common challenge faced in an Agile/Scrum team.
The difficulty of the scenario should be: {difficulty}.
{domain}
{customization}
{tier}
Provide ONLY the scenario.
Example: "During a sprint review, a key stakeholder expresses disappointment that a feature they considered high-priority was not completed, even though it was not part of the original sprint commitment.""#,
        difficulty = config.difficulty,
        domain = domain_instruction(config.domain),
        customization = customization_instruction(config),
        tier = difficulty_tiers(
            config.difficulty,
            "describe a straightforward process issue (e.g., daily stand-ups are running too long).",
            "describe a conflict or planning issue (e.g., the product owner frequently adds new work mid-sprint).",
            "describe a complex stakeholder or estimation problem (e.g., the team consistently overestimates their capacity, leading to missed deadlines and stakeholder frustration).",
        ),
    )
}

fn behavioral_scenario(config: &SessionConfig) -> String {
    format!(
        r#"You are an expert interviewer for a Business Analyst position.
{customization}
You are about to start a behavioral interview.
Provide a simple, welcoming opening statement to the candidate.
For example: "Thanks for coming in today. We're going to start with some questions about your past experiences."
Provide ONLY the opening statement."#,
        customization = customization_instruction(config),
    )
}

//=========================================================================================
// First-question templates
//=========================================================================================

fn case_study_first_question(_interview_type: InterviewType, scenario: &str) -> String {
    format!(
        r#"You are an expert Business Analyst interviewer grounded in the BABOK Guide.
Based on the following case study scenario, what is the best opening question to ask?
The question should prompt the candidate to begin with **Strategy Analysis**.
Scenario: "{scenario}"
Good examples: "How would you begin to approach this problem?", "What would be your first steps?"
**Format the question clearly. If it has multiple parts, use bullet points.**
Provide ONLY the question."#
    )
}

fn process_first_question(interview_type: InterviewType, scenario: &str) -> String {
    format!(
        r#"You are an expert Business Analyst interviewer.
Based on the following short scenario, what is the best opening question to ask for an interview focused on **{interview_type}**?
The question should be open-ended and directly related to the core topic. If the question has multiple parts, use bullet points for clarity.
Scenario: "{scenario}"
Provide ONLY the question."#
    )
}

fn technical_first_question(_interview_type: InterviewType, scenario: &str) -> String {
    format!(
        r#"You are an expert Technical Interviewer for a Business Analyst role.
Based on the following technical context, ask a relevant and specific technical question.
The question could be about SQL, API interaction, data modeling, or system design, depending on the context. If the question is complex, use bullet points.
Context: "{scenario}"
Example Question (for API context): "How would you design the request payload for the 'create shipment' endpoint?"
Example Question (for database context): "Write a SQL query to retrieve all customers who have not placed an order in the last 6 months."
Provide ONLY the question."#
    )
}

fn situational_first_question(_interview_type: InterviewType, scenario: &str) -> String {
    format!(
        r#"You are an expert interviewer for a Business Analyst position.
Based on the following challenging scenario, ask a question that prompts the candidate to explain how they would handle the situation.
The question should be open-ended. If the question has multiple parts, use bullet points for clarity.
Scenario: "{scenario}"
Good examples: "How would you proceed in this situation?", "What are your immediate next steps?", "Describe how you would handle this."
Provide ONLY the question."#
    )
}

fn system_design_first_question(_interview_type: InterviewType, scenario: &str) -> String {
    format!(
        r#"You are a system design interviewer.
The problem statement is: "{scenario}"
Ask a broad, open-ended opening question to kick off the design discussion.
The question should prompt the candidate to clarify requirements and scope. Use bullet points if the question has multiple parts.
Good examples: "How would you approach designing this system? What are the key functional and non-functional requirements we should consider?", "Before we dive into the architecture, what questions would you ask to clarify the scope and constraints of this problem?"
Provide ONLY the question."#
    )
}

fn dsa_first_question(_interview_type: InterviewType, scenario: &str) -> String {
    format!(
        r#"You are a DSA interviewer.
The problem is: "{scenario}"
Ask the candidate to explain their initial thoughts and approach.
The question should encourage them to think about data structures, algorithms, and complexity.
Good examples: "How would you approach solving this? You can start by explaining the brute-force solution.", "What data structures and algorithms come to mind for this problem? What is the expected time and space complexity?"
Provide ONLY the question."#
    )
}

fn agile_first_question(_interview_type: InterviewType, scenario: &str) -> String {
    format!(
        r#"You are an Agile coach and interviewer.
The scenario is: "{scenario}"
Ask an open-ended question that prompts the candidate to analyze the situation and propose a course of action.
Good examples: "As the Business Analyst/Scrum Master on this team, how would you handle this situation?", "What are your immediate next steps to address this issue?", "What principles of Agile or Scrum would guide your response here?"
Provide ONLY the question."#
    )
}

fn behavioral_first_question(_interview_type: InterviewType, scenario: &str) -> String {
    format!(
        r#"You are an expert Business Analyst interviewer.
Your opening statement to the candidate was: "{scenario}"
Now, ask a common, open-ended behavioral question to start the interview.
Good examples: "Tell me about a time you faced a significant challenge on a project.", "Describe a situation where you had to influence stakeholders without direct authority."
Provide ONLY the question."#
    )
}

//=========================================================================================
// Evaluation-focus templates
//=========================================================================================

fn case_study_focus(_interview_type: InterviewType) -> String {
    r#"**Evaluation Focus (BABOK-based Case Study):**
- Evaluate the candidate's response based on BABOK principles relevant to the previous question's category.
- **BABOK Question Categories:**
  - Strategy Analysis
  - Business Analysis Planning and Monitoring
  - Elicitation and Collaboration
  - Requirements Analysis and Design Definition (RADD)
  - Solution Evaluation
- **Next Question:** Select a logical BABOK category that has not been heavily covered yet to ensure a well-rounded interview. Formulate a question that fits this category. **Use bullet points if the question is complex or has multiple parts to ensure clarity.**
- **Question Category:** The category must be one of the BABOK categories listed above."#
        .to_string()
}

fn process_focus(interview_type: InterviewType) -> String {
    format!(
        r#"**Evaluation Focus ({interview_type}):**
- Assess the answer for clarity, depth, and relevance to {interview_type}. Does it demonstrate practical knowledge?
- **Next Question:** Ask a follow-up question that challenges their assumption or asks for more detail on their proposed process. Use bullet points if the question is complex or has multiple parts.
- **Question Category:** The category should be a sub-topic within {interview_type} (e.g., 'Stakeholder Identification', 'Prioritization', 'Test Case Design')."#
    )
}

fn technical_focus(_interview_type: InterviewType) -> String {
    r#"**Evaluation Focus (Technical):**
- Assess the answer for technical accuracy and correctness. If they provided code (e.g., SQL), is it valid and efficient?
- Did they explain their reasoning clearly? Do they understand the underlying concepts?
- **Next Question:** Ask a follow-up that builds on their answer (e.g., "How would you modify that query to also include X?"), or ask another technical question relevant to the context. Use bullet points for clarity.
- **Question Category:** The category should be the technical skill being tested (e.g., 'SQL Query', 'API Design', 'Data Mapping')."#
        .to_string()
}

fn situational_focus(_interview_type: InterviewType) -> String {
    r#"**Evaluation Focus (Situational Judgement):**
- Evaluate the candidate's judgement, professionalism, and problem-solving approach.
- Did they consider multiple perspectives (e.g., business needs, technical constraints, stakeholder impact)?
- Was their proposed action plan logical and diplomatic?
- **Next Question:** Ask a follow-up that explores the potential consequences of their proposed action or introduces a new complication to the scenario. Use bullet points if the question has multiple parts.
- **Question Category:** The category should reflect the core conflict (e.g., 'Stakeholder Management', 'Scope Creep', 'Conflict Resolution')."#
        .to_string()
}

fn system_design_focus(_interview_type: InterviewType) -> String {
    r#"**Evaluation Focus (System Design):**
- Did the candidate clarify requirements (functional/non-functional) before diving into design?
- Assess their high-level architecture. Did they consider scalability, availability, and fault tolerance?
- Evaluate their choice of components (e.g., database, cache, load balancer, message queues). Did they justify their trade-offs?
- **Next Question:** Dig deeper into a specific component of their design. For example, "Let's talk more about your database choice. Why did you choose NoSQL over SQL here?", "How would you ensure the caching layer remains consistent with the primary database?"
- **Question Category:** The category should be a system design concept (e.g., 'API Design', 'Database Schema', 'Caching Strategy', 'Scalability')."#
        .to_string()
}

fn dsa_focus(_interview_type: InterviewType) -> String {
    r#"**Evaluation Focus (DSA):**
- Is the proposed solution correct? Does it handle edge cases?
- Evaluate the time and space complexity (Big O notation). Is the solution optimal?
- Did the candidate clearly explain their thought process?
- **Next Question:** Ask for an optimization of their current solution, or ask them to write pseudo-code or actual code for their algorithm. For example, "That's a good brute-force solution. Can you think of a more optimal approach to reduce the time complexity?", "How would you handle negative numbers in the input array?"
- **Question Category:** The category should be a DSA concept (e.g., 'Time/Space Complexity', 'Optimization', 'Edge Cases', 'Algorithm Implementation')."#
        .to_string()
}

fn agile_focus(_interview_type: InterviewType) -> String {
    r#"**Evaluation Focus (Agile/Scrum):**
- Does the answer demonstrate a solid understanding of Agile principles and the Scrum framework (roles, events, artifacts)?
- Is the proposed solution practical and collaborative? Does it empower the team?
- Does the candidate show good communication and facilitation skills?
- **Next Question:** Ask a follow-up question that challenges their proposed action or explores their knowledge of a specific Agile practice. For example, "What if the Product Owner insists on their approach? How would you facilitate that conversation?", "What metrics could you use to track team improvement in this area?"
- **Question Category:** The category should be an Agile/Scrum topic (e.g., 'Sprint Planning', 'Stakeholder Management', 'Retrospectives', 'Backlog Refinement')."#
        .to_string()
}

fn behavioral_focus(_interview_type: InterviewType) -> String {
    r#"**Evaluation Focus (Behavioral):**
- Evaluate the answer based on the STAR method (Situation, Task, Action, Result). Did the candidate structure their response well?
- Was the example relevant? Was the outcome clear?
- **Next Question:** Ask another behavioral question that explores a different competency (e.g., teamwork, conflict resolution, problem-solving).
- **Question Category:** The category should be the competency you are targeting (e.g., 'Conflict Resolution')."#
        .to_string()
}

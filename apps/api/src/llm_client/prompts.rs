// Retrieval-QA prompt templates.
// All prompts for candidate question answering are defined here.

pub const QA_SYSTEM: &str = "\
You are a careful assistant that answers questions about a job candidate \
using ONLY the resume excerpts provided in the prompt. \
If the excerpts do not contain the answer, say that you don't know — \
never invent names, dates, links, or experience.";

pub const QA_PROMPT: &str = "\
Use the following pieces of context to answer the question at the end. \
If you don't know the answer, just say that you don't know, don't try to make up an answer.

{context}

Question: {question}
Helpful Answer:";

/// Fills the QA template with retrieved context and the question.
pub fn build_qa_prompt(context: &str, question: &str) -> String {
    QA_PROMPT
        .replace("{context}", context)
        .replace("{question}", question)
}

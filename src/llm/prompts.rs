//! Prompt template for the evidence judge.

/// Collection of prompts used for judging evidence.
pub struct Prompts;

impl Prompts {
    /// Prompt asking the judge to break both evidence texts into atomic
    /// facts and count how many facts each side supports of the other.
    ///
    /// The response contract is the four count fields consumed by the
    /// judgment parser; the surrounding "facts in ..." strings are free
    /// text and ignored.
    pub fn atomic_fact_counts() -> &'static str {
        r#"You will get as input a claim, a reference evidence and a predicted evidence.
Please verify the correctness of the predicted evidence by comparing it to the reference evidence, following these steps:
1. Break down the PREDICTED evidence into independent facts. Each fact should be a separate sentence.
2. Evaluate each fact individually: is the fact supported by the REFERENCE evidence? Do not use additional sources or background knowledge.
3. Next, break down the REFERENCE evidence into independent facts. Each fact should be a separate sentence.
4. Evaluate each fact individually: is the fact supported by the PREDICTED evidence? Do not use additional sources or background knowledge.
5. Finally summarise (1.) how many predicted facts are supported by the reference evidence, (2.) how many reference facts are supported by the predicted evidence.

Generate the output in form of a json in the following format:
{
    "facts in predicted evidence": "<numbered list of facts>",
    "fact check predicted evidence": "<verdict per fact with a short justification>",
    "facts count predicted evidence": <number of facts in the predicted evidence>,
    "support predicted evidence": <number of predicted facts supported by the reference evidence>,
    "facts in reference evidence": "<numbered list of facts>",
    "fact check reference evidence": "<verdict per fact with a short justification>",
    "facts count reference evidence": <number of facts in the reference evidence>,
    "support reference evidence": <number of reference facts supported by the predicted evidence>
}

Directly return the final JSON structure. Do not output anything else.

Input:

Claim: {claim}
Reference evidence: {reference_evidence}
Predicted evidence: {predicted_evidence}
Output:
"#
    }

    /// Fill the judge template with one example's fields.
    pub fn fill_judge_prompt(
        claim: &str,
        reference_evidence: &str,
        predicted_evidence: &str,
    ) -> String {
        Self::atomic_fact_counts()
            .replace("{claim}", claim)
            .replace("{reference_evidence}", reference_evidence)
            .replace("{predicted_evidence}", predicted_evidence)
    }
}

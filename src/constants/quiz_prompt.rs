pub const ARTICLE_TEXT_PLACEHOLDER: &str = "{article_text}";
pub const FORMAT_INSTRUCTIONS_PLACEHOLDER: &str = "{format_instructions}";

pub const QUIZ_GENERATION_PROMPT: &str = "You are an expert quiz creator. Your task is to generate a challenging,
multiple-choice quiz based on the provided article text.

The quiz should test key concepts, facts, and entities from the text.
You must generate 5-10 questions.

For each question, you must provide:
1.  The question text.
2.  Four multiple-choice options.
3.  The single correct answer, copied exactly from one of the options.
4.  A **short explanation** for why that answer is correct.
5.  A **difficulty rating** ('easy', 'medium', or 'hard').

You must also provide a list of 3-5 **suggested related topics** for further reading.

Here is the article text:
---
{article_text}
---

Now, generate the quiz. You must follow this exact JSON format.
{format_instructions}
";

pub const FORMAT_INSTRUCTIONS_PREAMBLE: &str = "The output must be a single JSON object that conforms to the JSON schema below. \
Return only the JSON object, with no commentary and no Markdown.";

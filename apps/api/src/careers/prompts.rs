// Career match prompt templates.

pub const PARSE_JOBS_TASK: &str = "\
You are an expert scraper. Given the HTML of a careers page, extract every job posting. \
Return a JSON array of objects with the keys \"title\", \"location\", \"url\" and \"skills\" \
(an array of required skill names). Use null for unknown location or url.";

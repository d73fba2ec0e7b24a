//! Prompt text for the two model calls
//!
//! All user-facing output is Dutch, so the prompts are too.

use crate::models::Identification;

/// Identification (vision) system prompt
pub const IDENTIFY_SYSTEM: &str = "\
Je bent Unhyped.
Taak: herken alleen de FILM/TV-titel uit een poster/streamingscherm.

REGELS:
- Geen tekst over scan/foto/poster/camera.
- Als je het niet zeker weet: zet confidence laag en laat year/type leeg/unknown.
- Output: JSON en alleen JSON.";

/// Identification user instruction, sent alongside the image
pub const IDENTIFY_USER: &str = "\
Haal uit dit beeld de titel + (optioneel) jaartal en type.
Return EXACT JSON:
{
  \"title\": string,
  \"year\": number|null,
  \"type\": \"movie\"|\"tv\"|\"unknown\",
  \"confidence\": \"low\"|\"medium\"|\"high\"
}
";

/// Analysis system prompt: policy, scoring rubric and output schema
pub const ANALYSIS_SYSTEM: &str = "\
Je bent Unhyped: een onafhankelijke filmchecker.
Doel: in 30 seconden helderheid, zonder sterren en zonder hype.

BELANGRIJK:
- Je MOET web search gebruiken om publieke, niet-gesponsorde kijkerservaringen te vinden (reviews/discussies).
- Baseer mismatch/hype/influencers op wat er op het internet over deze film wordt gezegd.
- Geen tekst over scan/foto/poster/camera.
- Geen ChatGPT-symbolen zoals '-' of '•' in velden (jij levert tekst, UI maakt bullets).
- Geen plotspoilers.

METER SCORES (0-100):
- mismatch.score = kans op teleurstelling door verkeerde verwachting, gebaseerd op reviews (\"verwachtte X, kreeg Y\").
- hype.score = hoeveel hype/marketingdruk er rond de film lijkt (trending/most anticipated/media push).
- influencers.score = hoeveel influencer-achtige content rond de film aanwezig lijkt (TikTok/YouTube/IG mentions/reaction vids).
Gebruik conservatieve scores als je weinig bewijs vindt.

VERDICT:
- verdict.line exact: \"Leuk als je X zoekt — maar verwacht geen Y\" (X/Y kort, menselijk).

FILMSUMMARY:
- 2-3 zinnen, mensentaal.

AUDIENCE:
- worksFor (max 8) = voor wie deze film waarschijnlijk goed werkt.
- skipIf (max 8) = voor wie deze film waarschijnlijk NIET werkt.

VERWACHTINGSKLOOF:
- promise/reality/why: elk 1-3 zinnen.
- Dit moet echt gebaseerd zijn op publieke verwachtingen vs ervaringen.

OUTPUT:
- Geef STRICT JSON en alleen JSON, passend bij dit schema:
{
  \"identified\": { \"title\": string, \"year\": number|null, \"type\": \"movie\"|\"tv\"|\"unknown\", \"confidence\": \"low\"|\"medium\"|\"high\" },
  \"filmSummary\": string,
  \"verdict\": { \"line\": string, \"bullets\": [string, string, string] },
  \"dashboard\": {
    \"mismatch\": { \"score\": number, \"level\": \"low\"|\"medium\"|\"high\"|\"unknown\", \"shortWhy\": string },
    \"hype\": { \"score\": number, \"level\": \"low\"|\"medium\"|\"high\"|\"unknown\", \"shortWhy\": string },
    \"influencers\": { \"score\": number, \"level\": \"low\"|\"medium\"|\"high\"|\"unknown\", \"shortWhy\": string }
  },
  \"worksFor\": [string],
  \"skipIf\": [string],
  \"expectationGap\": { \"promise\": string, \"reality\": string, \"why\": string },
  \"sources\": [{ \"title\": string, \"url\": string }]
}
";

/// Analysis user prompt naming the identified title (and year, if known)
pub fn analysis_user_prompt(identified: &Identification) -> String {
    let year_part = identified
        .year
        .map(|y| format!(" ({})", y))
        .unwrap_or_default();

    format!(
        "Zoek op het web naar publieke kijkerservaringen, reviews en discussie over: \"{}\"{}.\n\
         Focus op: (1) verwachting vs werkelijkheid, (2) hype/marketingdruk, (3) influencer-achtige buzz.\n\
         Gebruik meerdere bronnen (bijv. reviewsites, artikelen, fora).\n\
         Schrijf in helder Nederlands, zonder spoilers.\n\
         Return STRICT JSON volgens het schema uit de system prompt.",
        identified.title, year_part
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Confidence, TitleType};

    #[test]
    fn test_analysis_prompt_with_year() {
        let id = Identification {
            title: "Dune".to_string(),
            year: Some(2021),
            kind: TitleType::Movie,
            confidence: Confidence::High,
        };
        let prompt = analysis_user_prompt(&id);
        assert!(prompt.contains("\"Dune\" (2021)."));
        assert!(prompt.ends_with("system prompt."));
    }

    #[test]
    fn test_analysis_prompt_without_year() {
        let id = Identification {
            title: "Severance".to_string(),
            ..Default::default()
        };
        assert!(analysis_user_prompt(&id).contains("\"Severance\"."));
    }

    #[test]
    fn test_identify_prompts_demand_json() {
        assert!(IDENTIFY_SYSTEM.contains("alleen JSON"));
        assert!(IDENTIFY_USER.contains("\"confidence\""));
        assert!(ANALYSIS_SYSTEM.contains("\"dashboard\""));
    }
}

//! Speaker analysis — per-speaker accumulation over participant keys.

use std::collections::BTreeMap;

use indexmap::IndexMap;

use crate::models::{CompanyCount, SessionRecord, SpeakerAnalysis, SpeakerProfile, TalkRef};

use super::round1;

/// Every participant of every raw record counts once per session occurrence.
/// Name, company and job title are fixed at first sight of a speaker key and
/// never updated by later records. The talk-count histogram is maintained
/// incrementally — a speaker moves from their old bucket to the new one on
/// each additional talk — so only its end state is meaningful.
pub fn speaker_analysis(talks: &[SessionRecord]) -> SpeakerAnalysis {
    let mut speakers: IndexMap<String, SpeakerProfile> = IndexMap::new();
    let mut companies: IndexMap<String, usize> = IndexMap::new();
    let mut distribution: BTreeMap<usize, usize> = BTreeMap::new();

    for talk in talks {
        let talk_ref = TalkRef {
            title: talk.display_title(),
            code: talk.code.clone().unwrap_or_default(),
            talk_type: talk.session_type(),
        };

        for participant in &talk.participants {
            let entry = speakers
                .entry(participant.identity_key())
                .or_insert_with(|| SpeakerProfile {
                    name: participant.display_name(),
                    company: participant.company(),
                    job_title: participant.job_title(),
                    talk_count: 0,
                    talks: Vec::new(),
                });

            if entry.talk_count > 0 {
                if let Some(bucket) = distribution.get_mut(&entry.talk_count) {
                    *bucket -= 1;
                    if *bucket == 0 {
                        distribution.remove(&entry.talk_count);
                    }
                }
            }
            entry.talk_count += 1;
            entry.talks.push(talk_ref.clone());
            *distribution.entry(entry.talk_count).or_insert(0) += 1;

            *companies.entry(participant.company()).or_insert(0) += 1;
        }
    }

    let avg_talks_per_speaker = if speakers.is_empty() {
        0.0
    } else {
        let total: usize = speakers.values().map(|s| s.talk_count).sum();
        round1(total as f64 / speakers.len() as f64)
    };

    // Stable sorts: ties keep first-seen order.
    let mut speaker_list: Vec<SpeakerProfile> = speakers.into_values().collect();
    speaker_list.sort_by(|a, b| b.talk_count.cmp(&a.talk_count));

    let mut company_list: Vec<CompanyCount> = companies
        .into_iter()
        .map(|(name, count)| CompanyCount { name, count })
        .collect();
    company_list.sort_by(|a, b| b.count.cmp(&a.count));

    SpeakerAnalysis {
        speakers: speaker_list,
        companies: company_list,
        avg_talks_per_speaker,
        speaker_talk_distribution: distribution,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Participant;

    fn speaker(id: &str, name: &str, company: &str) -> Participant {
        Participant {
            speaker_id: Some(id.to_string()),
            full_name: Some(name.to_string()),
            company_name: Some(company.to_string()),
            ..Default::default()
        }
    }

    fn talk(code: &str, title: &str, participants: Vec<Participant>) -> SessionRecord {
        SessionRecord {
            code: Some(code.to_string()),
            title: Some(title.to_string()),
            participants,
            ..Default::default()
        }
    }

    #[test]
    fn test_repeat_speaker_accumulates() {
        let talks = vec![
            talk("A1", "One", vec![speaker("sp-1", "Grace Hopper", "Navy")]),
            talk("B2", "Two", vec![speaker("sp-1", "Grace Hopper", "Navy")]),
            talk("C3", "Three", vec![speaker("sp-1", "Grace Hopper", "Navy")]),
        ];
        let analysis = speaker_analysis(&talks);
        assert_eq!(analysis.speakers.len(), 1);
        assert_eq!(analysis.speakers[0].talk_count, 3);
        assert_eq!(analysis.speakers[0].talks.len(), 3);
        assert!(analysis.speaker_talk_distribution[&3] >= 1);
        assert_eq!(
            analysis.speaker_talk_distribution.get(&1),
            None,
            "emptied histogram buckets are dropped"
        );
    }

    #[test]
    fn test_first_seen_company_wins() {
        let talks = vec![
            talk("A1", "One", vec![speaker("sp-1", "Ada", "Acme")]),
            talk("B2", "Two", vec![speaker("sp-1", "Ada", "Globex")]),
        ];
        let analysis = speaker_analysis(&talks);
        assert_eq!(analysis.speakers[0].company, "Acme");
        // The company tally still counts both associations.
        let acme = analysis.companies.iter().find(|c| c.name == "Acme").unwrap();
        let globex = analysis.companies.iter().find(|c| c.name == "Globex").unwrap();
        assert_eq!(acme.count, 1);
        assert_eq!(globex.count, 1);
    }

    #[test]
    fn test_talk_count_sum_matches_associations() {
        let talks = vec![
            talk(
                "A1",
                "One",
                vec![speaker("sp-1", "Ada", "Acme"), speaker("sp-2", "Grace", "Navy")],
            ),
            // Duplicate record: its associations count again on purpose.
            talk(
                "A1",
                "One",
                vec![speaker("sp-1", "Ada", "Acme"), speaker("sp-2", "Grace", "Navy")],
            ),
            talk("B2", "Two", vec![speaker("sp-1", "Ada", "Acme")]),
        ];
        let analysis = speaker_analysis(&talks);
        let counted: usize = analysis.speakers.iter().map(|s| s.talk_count).sum();
        assert_eq!(counted, 5);
        let company_total: usize = analysis.companies.iter().map(|c| c.count).sum();
        assert_eq!(company_total, 5);
    }

    #[test]
    fn test_sort_descending_with_stable_ties() {
        let talks = vec![
            talk("A1", "One", vec![speaker("sp-1", "First Seen", "X")]),
            talk("B2", "Two", vec![speaker("sp-2", "Second Seen", "Y")]),
            talk(
                "C3",
                "Three",
                vec![speaker("sp-3", "Busy", "Z"), speaker("sp-3", "Busy", "Z")],
            ),
        ];
        let analysis = speaker_analysis(&talks);
        assert_eq!(analysis.speakers[0].name, "Busy");
        assert_eq!(analysis.speakers[1].name, "First Seen");
        assert_eq!(analysis.speakers[2].name, "Second Seen");
    }

    #[test]
    fn test_anonymous_participants_share_unknown_bucket() {
        let talks = vec![
            talk("A1", "One", vec![Participant::default()]),
            talk("B2", "Two", vec![Participant::default()]),
        ];
        let analysis = speaker_analysis(&talks);
        assert_eq!(analysis.speakers.len(), 1);
        assert_eq!(analysis.speakers[0].name, "Unknown");
        assert_eq!(analysis.speakers[0].talk_count, 2);
    }

    #[test]
    fn test_avg_talks_per_speaker() {
        let talks = vec![
            talk("A1", "One", vec![speaker("sp-1", "Ada", "Acme")]),
            talk("B2", "Two", vec![speaker("sp-1", "Ada", "Acme")]),
            talk("C3", "Three", vec![speaker("sp-2", "Grace", "Navy")]),
        ];
        let analysis = speaker_analysis(&talks);
        assert_eq!(analysis.avg_talks_per_speaker, 1.5);
        assert_eq!(speaker_analysis(&[]).avg_talks_per_speaker, 0.0);
    }
}

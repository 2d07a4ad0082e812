/*!
 * TSX source templates for the web front end.
 *
 * Three files are produced per book:
 * - `book{B}-resources-common.tsx`: helper constructors, written only once
 * - `book{B}-unit{U}-resources.tsx`: the unit's videos then games
 * - `book{B}-unit{U}-implementation.tsx`: lesson plans, for selected books
 */

use serde::{Deserialize, Serialize};

use crate::extraction::{BookMap, EmbedResource, UnitRecord, namespaced_key};
use indexmap::IndexMap;

const WORDWALL_EMBED_BASE: &str = "https://wordwall.net/embed/";

const COMMON_TEMPLATE: &str = r#"
import { TeacherResource } from '@/components/TeacherResources';

/**
 * This file contains common resources and helper functions for Book __BOOK__ that will be shared
 * across multiple units. It provides functions to generate standardized resources
 * for any unit in Book __BOOK__.
 */

// Unit titles for reference in lesson plans and resources
export const BOOK__BOOK___UNIT_TITLES: Record<string, string> = {
  // Add unit titles as they become available
  // Example: '1': 'Unit Title',
};

/**
 * Helper function to create a Book __BOOK__ video resource with consistent formatting
 * @param unitNumber The unit number
 * @param index The index of the video within the unit
 * @param title The title of the video
 * @param youtubeId The YouTube video ID
 * @param description Optional description of the video
 * @returns A formatted TeacherResource object
 */
export function createBook__BOOK__VideoResource(
  unitNumber: number,
  index: number,
  title: string,
  youtubeId: string,
  description?: string
): TeacherResource {
  return {
    id: `book__BOOK__-unit${unitNumber}-video${index}`,
    bookId: '__BOOK__',
    unitId: unitNumber.toString(),
    title,
    resourceType: 'video',
    provider: 'YouTube',
    sourceUrl: `https://www.youtube.com/embed/${youtubeId}`,
    embedCode: `<iframe width="560" height="315" src="https://www.youtube.com/embed/${youtubeId}" title="YouTube video player" frameborder="0" allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture; web-share" referrerpolicy="strict-origin-when-cross-origin" allowfullscreen></iframe>`,
    description
  };
}

/**
 * Helper function to create a Book __BOOK__ Wordwall game resource with consistent formatting
 * @param unitNumber The unit number
 * @param index The index of the game within the unit
 * @param title The title of the game
 * @param wordwallUrl The Wordwall embed URL
 * @param description Optional description of the game
 * @returns A formatted TeacherResource object
 */
export function createBook__BOOK__GameResource(
  unitNumber: number,
  index: number,
  title: string,
  wordwallUrl: string,
  description?: string
): TeacherResource {
  return {
    id: `book__BOOK__-unit${unitNumber}-game${index}`,
    bookId: '__BOOK__',
    unitId: unitNumber.toString(),
    title,
    resourceType: 'game',
    provider: 'Wordwall',
    sourceUrl: wordwallUrl,
    embedCode: `<iframe style="max-width:100%" src="${wordwallUrl}" width="500" height="380" frameborder="0" allowfullscreen></iframe>`,
    description
  };
}
"#;

const LESSON_PLAN_TEMPLATE: &str = r#"
/**
 * Implementation file for Book __BOOK__ Unit __UNIT__: __TITLE__
 *
 * This unit focuses on teaching __TOPIC__ vocabulary and expressions
 */

import { LessonPlan, LessonStep } from '@/components/LessonPlanTemplate';
import { TeacherResource } from '@/components/TeacherResources';
import { book__BOOK__Unit__UNIT__Resources } from './book__BOOK__-unit__UNIT__-resources';

// Export a function to get resources for this unit
export const getBook__BOOK__Unit__UNIT__Resources = (): TeacherResource[] => {
  return book__BOOK__Unit__UNIT__Resources;
};

// Export a function to get lesson plans for this unit
export const generateUnit__UNIT__LessonPlans = (): LessonPlan[] => {
  return [
    // Lesson Plan 1 - Introduction to __TITLE__ (45 minutes)
    {
      id: 'book__BOOK__-unit__UNIT__-lesson1',
      title: 'Introduction to __TITLE__ - Lesson 1',
      duration: '45 minutes',
      level: 'Beginner',
      objectives: [
        'Learn basic __TOPIC__ vocabulary',
        'Identify different __TOPIC__ items',
        'Use simple sentences with __TOPIC__ vocabulary'
      ],
      materials: [
        'Visual English Book __BOOK__ - Unit __UNIT__ slides',
        '__TITLE__ flashcards',
        '__TITLE__ videos from resources section',
        'Drawing paper and colored pencils'
      ],
      steps: [
        {
          title: 'Warm-up',
          duration: '5 minutes',
          description: 'Greet students and introduce the topic of __TOPIC__. Show flashcards one by one and ask students to repeat the vocabulary.'
        },
        {
          title: 'Presentation',
          duration: '10 minutes',
          description: 'Play the __TITLE__ vocabulary video. Pause at different points to reinforce vocabulary. Introduce key expressions related to __TOPIC__.'
        },
        {
          title: 'Practice',
          duration: '15 minutes',
          description: 'Pair activity: Students practice using the vocabulary in simple conversations. Teacher monitors and provides feedback.'
        },
        {
          title: 'Activity',
          duration: '10 minutes',
          description: 'Students complete a worksheet or game related to __TOPIC__ vocabulary.'
        },
        {
          title: 'Wrap-up',
          duration: '5 minutes',
          description: 'Review the vocabulary learned today. Play a quick game to reinforce learning. Assign simple homework related to the topic.'
        }
      ],
      assessmentTips: 'Monitor students during pair work for proper use of vocabulary. Check worksheet completion for understanding.',
      homeworkIdeas: [
        'Complete a related worksheet',
        'Draw and label __TOPIC__ items learned in class'
      ],
      additionalResources: [
        {
          title: '__TITLE__ Resources',
          url: '#'
        }
      ]
    },

    // Lesson Plan 2 - __TITLE__ In Practice (45 minutes)
    {
      id: 'book__BOOK__-unit__UNIT__-lesson2',
      title: '__TITLE__ In Practice - Lesson 2',
      duration: '45 minutes',
      level: 'Beginner',
      objectives: [
        'Review and expand __TOPIC__ vocabulary',
        'Practice using __TOPIC__ in dialogues',
        'Develop communication skills through themed activities'
      ],
      materials: [
        'Visual English Book __BOOK__ - Unit __UNIT__ slides',
        'Interactive __TOPIC__ games',
        'Role-play cards',
        'Art supplies for craft activity'
      ],
      steps: [
        {
          title: 'Warm-up',
          duration: '5 minutes',
          description: 'Review __TOPIC__ vocabulary from previous lesson with a quick game.'
        },
        {
          title: 'Presentation',
          duration: '10 minutes',
          description: 'Introduce new concepts related to __TOPIC__. Show examples and model language patterns.'
        },
        {
          title: 'Practice',
          duration: '15 minutes',
          description: 'Group activity: Students work together on a task related to __TOPIC__. Each group presents their work to the class.'
        },
        {
          title: 'Interactive Game',
          duration: '10 minutes',
          description: 'Use one of the Wordwall __TOPIC__ games for interactive practice. Students take turns playing while others help.'
        },
        {
          title: 'Wrap-up',
          duration: '5 minutes',
          description: 'Review all vocabulary and concepts learned. Students share one new thing they learned about __TOPIC__ today.'
        }
      ],
      assessmentTips: 'Check student understanding through game participation. Monitor use of language during the group activity.',
      homeworkIdeas: [
        'Create a project related to __TOPIC__',
        'Practice vocabulary with family members'
      ],
      additionalResources: [
        {
          title: '__TITLE__ Activity Ideas',
          url: '#'
        }
      ]
    }
  ];
};
"#;

/// One file the `resources` command will write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name relative to the output directory
    pub name: String,
    pub contents: String,
    /// Leave an existing file untouched
    pub only_if_absent: bool,
}

/// Entry of `resources-summary.json`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryUnit {
    pub book_id: String,
    pub unit_id: String,
    pub title: String,
    pub resources: Vec<SummaryResource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResource {
    #[serde(rename = "type")]
    pub kind: String,
    pub provider: String,
    pub id: String,
    pub title: String,
    pub embed_code: String,
    pub url: String,
}

/// Escape single quotes for a single-quoted TS string literal
pub fn escape_single_quotes(text: &str) -> String {
    text.replace('\'', "\\'")
}

pub fn common_file_name(book_id: &str) -> String {
    format!("book{}-resources-common.tsx", book_id)
}

pub fn resources_file_name(book_id: &str, unit_id: &str) -> String {
    format!("book{}-unit{}-resources.tsx", book_id, unit_id)
}

pub fn lesson_plan_file_name(book_id: &str, unit_id: &str) -> String {
    format!("book{}-unit{}-implementation.tsx", book_id, unit_id)
}

pub fn render_common(book_id: &str) -> String {
    COMMON_TEMPLATE.replace("__BOOK__", book_id)
}

pub fn render_lesson_plan(book_id: &str, unit_id: &str, title: &str) -> String {
    LESSON_PLAN_TEMPLATE
        .replace("__BOOK__", book_id)
        .replace("__UNIT__", unit_id)
        .replace("__TITLE__", title)
        .replace("__TOPIC__", &title.to_lowercase())
}

pub fn render_unit_resources(book_id: &str, unit_id: &str, unit: &UnitRecord) -> String {
    let topic = unit.title.to_lowercase();
    let mut out = format!(
        r#"
import {{ TeacherResource }} from '@/components/TeacherResources';
import {{ createBook{book}VideoResource, createBook{book}GameResource }} from './book{book}-resources-common';

/**
 * Resources for Book {book} Unit {unit}: {title}
 *
 * This file contains video and game resources for teaching
 * {topic}
 */

export const book{book}Unit{unit}Resources: TeacherResource[] = [
  // Videos
"#,
        book = book_id,
        unit = unit_id,
        title = unit.title,
        topic = topic,
    );

    for (index, video) in unit.videos.iter().enumerate() {
        out.push_str(&format!(
            "\n  createBook{}VideoResource(\n    {}, {},\n    '{}',\n    '{}',\n    'Educational video for {}'\n  ),",
            book_id,
            unit_id,
            index + 1,
            escape_single_quotes(&video.title),
            video.id,
            topic
        ));
    }

    out.push_str("\n\n  // Games\n");

    for (index, game) in unit.games.iter().enumerate() {
        out.push_str(&format!(
            "\n  createBook{}GameResource(\n    {}, {},\n    '{}',\n    '{}{}',\n    'Interactive game for practicing {}'\n  ),",
            book_id,
            unit_id,
            index + 1,
            escape_single_quotes(&game.title),
            WORDWALL_EMBED_BASE,
            game.id,
            topic
        ));
    }

    out.push_str("\n];\n");
    out
}

fn is_lesson_plan_book(book_id: &str, lesson_plan_books: &[String]) -> bool {
    lesson_plan_books.iter().any(|b| b.eq_ignore_ascii_case(book_id))
}

/// Every template file for the given books, in book then unit order
pub fn plan_files(books: &BookMap, lesson_plan_books: &[String]) -> Vec<GeneratedFile> {
    let mut files = Vec::new();

    for (book_id, units) in books {
        files.push(GeneratedFile {
            name: common_file_name(book_id),
            contents: render_common(book_id),
            only_if_absent: true,
        });

        for (unit_id, unit) in units {
            files.push(GeneratedFile {
                name: resources_file_name(book_id, unit_id),
                contents: render_unit_resources(book_id, unit_id, unit),
                only_if_absent: false,
            });

            if is_lesson_plan_book(book_id, lesson_plan_books) {
                files.push(GeneratedFile {
                    name: lesson_plan_file_name(book_id, unit_id),
                    contents: render_lesson_plan(book_id, unit_id, &unit.title),
                    only_if_absent: false,
                });
            }
        }
    }

    files
}

fn summary_resources(kind: &str, provider: &str, resources: &[EmbedResource]) -> Vec<SummaryResource> {
    resources
        .iter()
        .map(|r| SummaryResource {
            kind: kind.to_string(),
            provider: provider.to_string(),
            id: r.id.clone(),
            title: r.title.clone(),
            embed_code: r.embed.clone(),
            url: r.url.clone(),
        })
        .collect()
}

/// Contents of `resources-summary.json`, keyed `book{B}_unit{U}`
pub fn resources_summary(books: &BookMap) -> IndexMap<String, SummaryUnit> {
    let mut summary = IndexMap::new();
    for (book_id, units) in books {
        for (unit_id, unit) in units {
            let mut resources = summary_resources("video", "YouTube", &unit.videos);
            resources.extend(summary_resources("game", "Wordwall", &unit.games));

            summary.insert(namespaced_key(book_id, unit_id), SummaryUnit {
                book_id: book_id.clone(),
                unit_id: unit_id.clone(),
                title: unit.title.clone(),
                resources,
            });
        }
    }
    summary
}

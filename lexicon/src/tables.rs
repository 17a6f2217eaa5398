//! Static word tables. All entries lowercase; matching code lowercases input.

/// Greeting openers.
pub const GREETINGS: &[&str] = &[
    "oi", "oie", "olá", "ola", "eai", "e aí", "e ai", "opa", "fala", "salve", "bom dia",
    "boa tarde", "boa noite", "hey", "hi", "hello", "yo", "good morning", "good evening",
];

/// Farewell / conversation-closing tokens.
pub const CLOSINGS: &[&str] = &[
    "tchau", "xau", "até amanhã", "ate amanha", "até mais", "ate mais", "até logo",
    "falou", "flw", "fui", "vou dormir", "boa noite", "bye", "goodbye", "see you",
    "good night", "gotta go", "gtg",
];

/// Leading words that mark a question even without a `?`.
pub const QUESTION_WORDS: &[&str] = &[
    "que", "qual", "quais", "quando", "onde", "quem", "como", "quanto", "quanta",
    "por", "pq", "porque", "cadê", "cade", "será", "sera", "what", "which", "when",
    "where", "who", "how", "why", "whose", "can", "could", "would", "should", "do",
    "does", "did", "is", "are",
];

/// Bare acknowledgment tokens (standalone or in two-word reactions).
pub const ACKNOWLEDGMENTS: &[&str] = &[
    "ok", "okay", "okk", "blz", "beleza", "ta", "tá", "tabom", "bom", "certo", "vlw",
    "valeu", "obg", "obrigado", "obrigada", "sim", "s", "aham", "uhum", "hm", "hmm",
    "ah", "entendi", "saquei", "top", "show", "massa", "legal", "boa", "nice", "cool",
    "yes", "yep", "yeah", "sure", "thanks", "thx", "ty", "got", "it", "right", "true",
    "verdade", "pois", "é", "eh", "isso",
];

/// Substrings / words that mark a request or call to action.
pub const REQUEST_MARKERS: &[&str] = &[
    "pode", "poderia", "consegue", "me ajuda", "me manda", "manda", "me avisa",
    "me fala", "me diz", "preciso que", "faz um favor", "por favor", "can you",
    "could you", "would you", "please", "help me", "send me", "let me know",
];

/// Tail phrases that bounce the conversation back to the reader.
pub const REPLY_INVITERS: &[&str] = &[
    "né", "ne", "e você", "e vc", "e tu", "não acha", "nao acha", "o que acha",
    "o que você acha", "and you", "right", "you know", "don't you think", "what do you think",
];

/// Markers for "I have news" style openers.
pub const NEWS_MARKERS: &[&str] = &[
    "sabia que", "você sabia", "vc sabia", "adivinha", "adivinha só", "não vai acreditar",
    "nao vai acreditar", "tenho uma novidade", "deixa eu te contar", "guess what",
    "you won't believe", "you will not believe", "i have news", "big news",
];

/// Discourse fillers ranked for the style profile.
pub const FILLER_CANDIDATES: &[&str] = &[
    "tipo", "tipo assim", "sei lá", "sei la", "enfim", "então", "entao", "aí", "ai",
    "cara", "mano", "meu", "véi", "vei", "po", "pô", "assim", "daí", "dai", "like",
    "actually", "basically", "literally", "honestly", "anyway", "dude", "bro", "man",
    "well", "so",
];

/// Interjections ranked for the style profile.
pub const INTERJECTION_CANDIDATES: &[&str] = &[
    "nossa", "caramba", "eita", "ué", "ue", "uai", "poxa", "putz", "aff", "affs",
    "vish", "xi", "opa", "oxe", "caraca", "wow", "whoa", "oops", "ouch", "damn",
    "geez", "omg", "oof", "yikes", "ugh",
];

/// Affirmation tokens ranked for the style profile.
pub const AFFIRMATION_CANDIDATES: &[&str] = &[
    "sim", "claro", "com certeza", "certeza", "pode crer", "demais", "bora", "fechou",
    "fechado", "combinado", "beleza", "show", "top", "perfeito", "isso", "exato",
    "exatamente", "yes", "sure", "totally", "absolutely", "definitely", "for sure",
    "of course", "deal", "perfect", "exactly",
];

/// Negation tokens ranked for the style profile.
pub const NEGATION_CANDIDATES: &[&str] = &[
    "não", "nao", "n", "nem", "nunca", "jamais", "nada", "negativo", "no", "nope",
    "nah", "never", "not", "none",
];

/// Chat abbreviations counted for the uses_abbreviations signal.
pub const ABBREVIATIONS: &[&str] = &[
    "vc", "vcs", "tb", "tbm", "blz", "pq", "td", "mt", "mto", "mta", "hj", "dps",
    "msm", "qnd", "qdo", "qm", "cmg", "ctg", "vdd", "sdds", "sdd", "fds", "flw",
    "vlw", "obg", "gnt", "ngm", "agr", "amg", "bjs", "bj", "btw", "idk", "imo",
    "tbh", "brb", "omw", "thx", "ty", "u", "ur", "rn", "np", "ikr", "fyi",
];

/// Words that read formal; feed the formality score.
pub const FORMAL_INDICATORS: &[&str] = &[
    "por favor", "obrigado", "obrigada", "agradeço", "gostaria", "poderia",
    "cordialmente", "atenciosamente", "prezado", "prezada", "entretanto", "portanto",
    "todavia", "contudo", "ademais", "outrossim", "mediante", "conforme",
    "please", "thank you", "regards", "sincerely", "kindly", "however", "therefore",
    "furthermore", "nevertheless", "moreover", "regarding",
];

/// Words that read casual; feed the formality score.
pub const CASUAL_INDICATORS: &[&str] = &[
    "vc", "blz", "mano", "cara", "véi", "vei", "meu", "tipo", "kkk", "haha", "rsrs",
    "top", "show", "massa", "maneiro", "dahora", "daora", "rolê", "role", "treta",
    "migué", "migue", "bora", "partiu", "dude", "bro", "lol", "lmao", "gonna",
    "wanna", "gotta", "kinda", "sorta", "yeah", "nah", "cool", "awesome",
];

/// Formal connectives a casual writer structurally avoids; the never_uses
/// list is built from entries here absent from the user's corpus.
pub const COMMON_WORD_CANDIDATES: &[&str] = &[
    "portanto", "todavia", "entretanto", "contudo", "ademais", "outrossim",
    "destarte", "porquanto", "conquanto", "nao obstante", "furthermore",
    "nevertheless", "moreover", "henceforth", "notwithstanding", "albeit",
    "whilst", "thus", "hence", "therefore",
];

/// English loanwords common in Brazilian Portuguese chat; feed the
/// English-mixing signal.
pub const ENGLISH_LOANWORDS: &[&str] = &[
    "ok", "sorry", "nice", "cool", "top", "show", "dark", "link", "email", "feedback",
    "deadline", "meeting", "call", "home", "office", "crush", "date", "match",
    "random", "fake", "hype", "vibe", "mood", "cringe", "print", "story", "stories",
    "post", "like", "game", "gamer", "play", "download", "upload", "delivery",
    "drink", "happy", "hour",
];

/// Happy-register words for emotional phrase buckets.
pub const EMOTION_HAPPY: &[&str] = &[
    "feliz", "felicidade", "alegre", "alegria", "ótimo", "otimo", "maravilha",
    "maravilhoso", "incrível", "incrivel", "amei", "adorei", "perfeito", "demais",
    "happy", "glad", "great", "awesome", "amazing", "wonderful", "love", "loved",
];

/// Sad-register words for emotional phrase buckets.
pub const EMOTION_SAD: &[&str] = &[
    "triste", "tristeza", "chateado", "chateada", "deprimido", "deprimida", "chorar",
    "chorando", "saudade", "saudades", "péssimo", "pessimo", "horrível", "horrivel",
    "sad", "upset", "depressed", "crying", "terrible", "awful", "miss", "missing",
];

/// Excited-register words for emotional phrase buckets.
pub const EMOTION_EXCITED: &[&str] = &[
    "ansioso", "ansiosa", "animado", "animada", "empolgado", "empolgada", "mal posso",
    "não vejo a hora", "nao vejo a hora", "bora", "partiu", "excited", "hyped",
    "pumped", "can't wait", "cant wait", "stoked", "thrilled",
];

/// Frustrated-register words for emotional phrase buckets.
pub const EMOTION_FRUSTRATED: &[&str] = &[
    "raiva", "ódio", "odio", "irritado", "irritada", "estressado", "estressada",
    "saco", "droga", "merda", "aff", "affs", "putz", "angry", "mad", "annoyed",
    "annoying", "frustrated", "stressed", "hate", "ugh",
];

/// Function words excluded from ranked-word statistics.
pub const STOPWORDS: &[&str] = &[
    "a", "o", "as", "os", "um", "uma", "uns", "umas", "de", "do", "da", "dos", "das",
    "em", "no", "na", "nos", "nas", "por", "pra", "para", "com", "sem", "que", "e",
    "ou", "mas", "se", "eu", "tu", "ele", "ela", "nós", "nos", "eles", "elas", "me",
    "te", "meu", "minha", "seu", "sua", "isso", "isto", "aquilo", "esse", "essa",
    "este", "esta", "foi", "ser", "estar", "tá", "ta", "é", "eh", "era", "são", "sao",
    "the", "an", "of", "to", "in", "on", "at", "for", "and", "or", "but", "if", "it",
    "is", "are", "was", "were", "be", "been", "i", "you", "he", "she", "we", "they",
    "my", "your", "this", "that", "these", "those",
];

//! Built-in research map used when the shared document does not exist yet.

use crate::expand::ExpandState;
use crate::model::{DetailItem, MindMap, Node};

/// Presentation class attached to the built-in images.
pub const DEFAULT_IMAGE_CLASS: &str = "max-w-full h-auto rounded-lg my-2 shadow-md";

/// Top-level sections shown open on startup.
pub const DEFAULT_OPEN: [&str; 3] = ["cles_lecture", "enluminure_scenes", "manuscrit_enigmes"];

pub fn default_expanded() -> ExpandState {
    ExpandState::with_open(DEFAULT_OPEN)
}

fn text(value: &str) -> DetailItem {
    DetailItem::text(value)
}

fn img(src: &str, alt: &str) -> DetailItem {
    DetailItem::image(src, alt, DEFAULT_IMAGE_CLASS)
}

fn leaf(id: &str, label: &str, details: &[&str]) -> Node {
    Node::new(id, label).with_details(details.iter().map(|d| text(d)))
}

pub fn initial_mind_map() -> MindMap {
    MindMap::new(
        "🗺️ Carte Mentale : Enluminure et Manuscrit d'Énigmes (Dessin par Dessin, Mise à Jour)",
        [reading_keys(), illumination_scenes(), riddle_manuscript()],
    )
}

fn reading_keys() -> Node {
    Node::new("cles_lecture", "🔑 Clés de Lecture Transversales")
        .with_icon("🔑")
        .with_children([
            leaf(
                "chaines_dorees",
                "🔗 Le Motif des Chaînes Dorées",
                &[
                    "Ce motif est omniprésent et pourrait suggérer un dessin de constellation selon leur position ou un chemin tracé en reliant les chaînes.",
                    "Cheval noir (Général) 🐎",
                    "Clé de Saint Pierre (D1) 🔑",
                    "Biche couchée (D3) 🦌",
                    "Garde d'Excalibur (D4) ⚔️",
                    "Barque de l'homme capuché (D5) 🛶",
                    "Hermès (D7) ⚡",
                    "Vierge Marie (D7) 😇",
                    "Soldat Romain (D9) 🏛️",
                    "Dragon blanc à 3 têtes (D11) 🐉",
                ],
            )
            .with_icon("🔗"),
            leaf(
                "excalibur_details",
                "⚔️ L'Épée Excalibur (Centrale)",
                &[
                    "Centrale sur toute la longueur de la page d'enluminures.",
                    "Rayure sur la lame : Suggère un chemin à suivre ➡️",
                    "Sur la poignée : Symbole fond rouge et 3 carreaux blancs 🟥⬜",
                    "Garde (D4) : Chaînette en or pendante avec inscriptions possibles \"Noé (ou N-O)\" et \"S-E\" 🧭",
                ],
            )
            .with_icon("⚔️"),
            leaf(
                "blasons",
                "🛡️ Blasons et Héraldique",
                &[
                    "Blason rouge (Général) : Identifié comme celui du chevalier Kahedin 🟥",
                    "Blason avec 3 lapins (D1) : Pourrait correspondre au chevalier Courant de Roche Dure 🐇🐇🐇",
                    "Blason de Guillaume le Conquérant (D2) : Représenté sur la Tour de Londres 👑",
                    "Blason 5 châteaux forts et 2 lions (D10) : Sur le chevalier doré, à déterminer 🏰🦁",
                ],
            )
            .with_icon("🛡️"),
            Node::new("dates_refs", "🗓️ Dates et Références Historiques")
                .with_icon("🗓️")
                .with_details([
                    text("1066 (D4 et D7) : Sacre de Guillaume le Conquérant à Westminster, mort du roi Harold 👑💀"),
                    text("1095 (D7) : Date de la 1ère Croisade (Pape Urbain II) ✝️"),
                    img(
                        "https://www.wiki-rennes.fr/Fichier:Tapisserie_de_bayeux_rennes.jpg",
                        "Image of Tapisserie de Bayeux",
                    ),
                    text("Énigme 8 : \"Bayeux Evad. Ectu\" (déroute de Bayeux) lié à la Bataille d'Hastings."),
                ]),
            Node::new("syren_bells", "🔔 Le Motif des Cloches (\"Syren Bells\")")
                .with_icon("🔔")
                .with_details([
                    text("Quatre cloches reliées par des pointillés (D7) 🔔🔔🔔🔔"),
                    img(
                        "https://i.imgur.com/jl9vlhp.jpeg",
                        "Image of Chemin de cloches de Siren Bells",
                    ),
                    text("Trèfle des cartes (D11) : Ressemblance avec une des \"Syren Bells\" 🍀"),
                    text("Sanglier cachant une cloche (D12) 🐗🔔"),
                ]),
            leaf(
                "c_mystere",
                "C Mystérieux",
                &[
                    "Mentionné dans E6, E7 (\"4 C\" au féminin) et E10 (\"avant-dernier C\" au masculin).",
                    "Indique des tracés ou des points à identifier sur la carte (E7, E10).",
                ],
            )
            .with_icon("❓"),
        ])
}

fn illumination_scenes() -> Node {
    Node::new("enluminure_scenes", "🖼️ L'Enluminure : Scène par Scène")
        .with_icon("🖼️")
        .with_children([
            leaf(
                "page_generale",
                "Page Générale",
                &[
                    "4 Chevaliers dans médaillons (Coins) 🛡️: HG: SE ↘️ | HD: O ⬅️ | BG: E ➡️ | BD: NE ↗️",
                    "Couronne royale (Bas centre) 👑",
                ],
            ),
            leaf(
                "dessin1",
                "Dessin 1 : La Chute et la Quête",
                &[
                    "**Personnages** : Saint Pierre 😇, Adam & Ève 🍎, Dame du Lac Viviane 🧚‍♀️",
                    "**Lieux** : Carte Europe occidentale (tracé épée : Asturies-Pyrénées à Loch Ness) 🗺️⚔️",
                    "**Lien Énigme 2** : Tracé de l'épée sur la carte confirmé, début de la quête.",
                ],
            ),
            leaf(
                "dessin2",
                "Dessin 2 : Le Taureau, la Tour et les Chevaliers",
                &[
                    "**Animaux** : Taureau blanc (yeux rouges) 🐂🔴",
                    "**Lien Énigme 3** : La Tour de Londres (\"Tour-Krak boréale\") est la solution de l'énigme 3.",
                ],
            ),
            leaf(
                "dessin3",
                "Dessin 3 : Mystères de Cornouailles",
                &[
                    "**Texte/Symbole** : Carré Sator 📜 (SATOR AREPO TENET OPERA ROTAS)",
                    "**Lieux** : Château de Tintagel 🏰, Promontoire des Cornouailles ⛰️",
                ],
            ),
            leaf(
                "dessin4",
                "Dessin 4 : Hiver et Rencontres Divines",
                &[
                    "**Lieux** : Abbaye de Westminster ⛪, Bâtiments médiévaux (porte verte avec chaîne) 🏛️🔗",
                    "**Inscriptions** : \"HAROLD REX INTERFECTUS EST\" 📜, 1066 🗓️",
                ],
            ),
            Node::new("dessin5", "Dessin 5 : Écosse, Magie et Tempête").with_details([
                text("**Personnages** : Saint André (croix en X ✖️) 😇, Barde écossais 🎶🟥"),
                text("**Symboles** : Blason Clan Matheson (\"fac et spera\") 🟢🛡️"),
                img(
                    "https://upload.wikimedia.org/wikipedia/commons/thumb/4/4b/Clan_member_crest_badge_-_Clan_Matheson.svg/1280px-Clan_member_crest_badge_-_Clan_Matheson.svg.png",
                    "Image of Devise du Clan Matheson",
                ),
                text("Vitrail zodiaque Chartres (nappe) 🌈"),
            ]),
            leaf(
                "dessin6",
                "Dessin 6 : La Tente du Combat",
                &[
                    "**Lieu** : Tente sur plaine (guerre/chasse) 🏕️",
                    "**Inscriptions** : \"HIC SUNT MILITES\" (Tapisserie de Bayeux) 📜",
                ],
            ),
            Node::new("dessin7", "Dessin 7 : Urbain II, Jeu et Destin").with_details([
                text("**Personnages** : Pape Urbain II 👑✝️ (1095, 2 clés 🔑🔑), Ange 👼"),
                text("**Lieux** : Abbaye de Cluny ⛪ (\"AMEN\" en hébreu) 📜"),
                img("https://i.imgur.com/gKUGtxG.jpeg", "Image of Abbaye de Cluny"),
                text("**Lien Énigme 7** : Le jeu du moulin est la \"partie preux contre dieux\"."),
            ]),
            leaf(
                "dessin8",
                "Dessin 8 : Le Combat Céleste",
                &[
                    "**Ciel** : Jupiter (foudre) ⚡🪐, 2 Anges 👼, Grande couronne 👑",
                    "**Lieux** : Château bord de lac/étang 🏰🏞️",
                ],
            ),
            leaf(
                "dessin9",
                "Dessin 9 : Printemps et le Graal",
                &[
                    "**Paysage** : Printanier 🌸, Lac 2 cygnes 🦢🦢, Château 🏰",
                    "**Lien Énigme 6** : L'ancre et le diamant confirment l'Île de Wight (\"WIGHT\").",
                ],
            ),
            leaf(
                "dessin10",
                "Dessin 10 : Stonehenge et le Chevalier Solaire",
                &[
                    "**Personnages** : Merlin au centre Stonehenge 🧙🗿, Chevalier doré 🌟",
                    "**Lien Énigme 6** : Stonehenge (\"STANEHENGE\") est la solution décodée.",
                ],
            ),
            leaf(
                "dessin11",
                "Dessin 11 : Ténèbres et Apocalypse",
                &[
                    "**Animaux** : Dragon blanc à 3 têtes 🐉 (crache feu 🔥, chaîne patte 🔗)",
                    "**Lien Énigme 9** : Le dragon à 3 têtes peut être l'un des \"deux monstres\" de l'épopée.",
                ],
            ),
            leaf(
                "dessin12",
                "Dessin 12 : La Cène, Enfer et Paradis",
                &[
                    "**Symboles** : Sanglier cachant cloche 🐗🔔, 3 fleurs rouges (Patmos ?) 🌺🌺🌺",
                    "**Lien Énigme 13** : Le paysage paradisiaque est lié à Avalon.",
                ],
            ),
        ])
}

fn riddle_manuscript() -> Node {
    Node::new("manuscrit_enigmes", "📜 Le Manuscrit d'Énigmes : Structure et Indices")
        .with_icon("📜")
        .with_children([
            leaf(
                "medaillons_enigmes",
                "🏅 Médaillons Autour des Énigmes",
                &[
                    "Arthur (G) 👑 / Merlin (D) 🧙",
                    "Graal (G) 🏆 / Excalibur (D) ⚔️",
                    "Tristan (G, vert) 💚 / Lancelot (D, rouge) ❤️",
                ],
            )
            .with_icon("🏅"),
            leaf(
                "mot_central",
                "✍️ Mot Central : EXKALIBUR",
                &[
                    "Avec un \"K\" 😮",
                    "Chaque lettre avec un nombre différent de fleurs de lys ⚜️⚜️⚜️",
                ],
            )
            .with_icon("✍️"),
            leaf(
                "liste_enigmes_details",
                "📝 Liste des Énigmes (Titres, Initiales & Dessins)",
                &[
                    "**L'Anagramme Révélée :** Initiales des 13 énigmes (A I T E R L L S U N O C A) forment \"AU SIR LANCELOT\" 🛡️",
                    "1. Amis aventuriers : A (or sur fond vert) 🟡🟢",
                    "2. In principio : I (rouge) 🔴 + Viviane 🧚‍♀️",
                    "13. Ad vitam eternam : A (multicolore) 🌈 + Fontaine du Graal ⛲🏆",
                ],
            )
            .with_icon("📝"),
            Node::new("enigmes_textes", "📖 Textes Complets des Énigmes")
                .with_icon("📖")
                .with_children(riddle_texts()),
        ])
}

fn riddle_texts() -> Vec<Node> {
    vec![
        leaf(
            "enigme1_text",
            "Enigme 1 : Amis aventuriers",
            &["**Déductions :** Narrateur = Galaad. Importance du soleil et de la lune."],
        ),
        Node::new("enigme2_text", "Enigme 2 : In principio").with_details([
            text("**Déductions :** Tracé de l'épée sur la carte confirmé (lien D1)."),
            text("**Image du tracé de l'épée sur la carte :** "),
            img(
                "https://i.imgur.com/rO63nTd.jpeg",
                "Image of Tracé de l'épée sur la carte",
            ),
            text("Les Asturies dansaient avec les voiles, épuisées de chaleur et noyées d'espace. C'est ici que débute ta quête."),
        ]),
        leaf(
            "enigme3_text",
            "Enigme 3 : Terra incognita",
            &["**Déductions :** Résolue par \"Traianous\" ou \"Troia Nova\"."],
        ),
        leaf(
            "enigme4_text",
            "Enigme 4 : Ecce homo",
            &["**Déductions :** Couples identifiés : Tristan et Iseult (TI), Lancelot et Guenièvre (LG)."],
        ),
        Node::new("enigme5_text", "Enigme 5 : Rex dei gratia").with_details([
            text("**Déductions :** Anneau du sacre à Salisbury, bénédiction du règne à Thorn Ey."),
            img(
                "https://i.imgur.com/DI9ELyL.jpeg",
                "Image of Tracé modifié de l'énigme Rex dei gratia",
            ),
        ]),
        Node::new("enigme6_text", "Enigme 6 : Lux in tenebris").with_details([
            text("**Déductions :** \"STANEHENGE\" décodé à partir des 24 chevaliers et décimales."),
            img(
                "https://upload.wikimedia.org/wikipedia/commons/c/c8/Winchester_-_Table_ronde_du_roi_Arthur.JPG",
                "Image of Table ronde du roi Arthur",
            ),
            text("6.4 -2.9 - 1.2 - 5.4 - 23.7 - 14.9 - 1.1 - 24.6- 9.7 - 9 - 1 - 7×9 - 1 & 2 -3 -C Eurêka."),
        ]),
        leaf(
            "enigme7_text",
            "Enigme 7 : Libera nos a malo",
            &["Observe la partie, preux contre dieux. Commencera le Père, et finiront les cieux."],
        ),
        Node::new("enigme8_text", "Enigme 8 : Sub rosa").with_details([
            text("**Déductions :** \"Bayeux Evad. Ectu\" = déroute de Bayeux."),
            img(
                "https://upload.wikimedia.org/wikipedia/commons/thumb/1/1a/Maison_d%27Adam_et_%C3%88ve_Bayeux.jpg/1280px-Maison_d%27Adam_et_%C3%88ve_Bayeux.jpg",
                "Image of Maison d'Adam et Ève à Bayeux",
            ),
        ]),
        leaf(
            "enigme9_text",
            "Enigme 9 : Ultima Cena",
            &["Compte les pétales de la fleur de Patmos, et l'an de grâce qui vit mourir le numéro 1."],
        ),
        leaf(
            "enigme10_text",
            "Enigme 10 : Noli me tangere",
            &["**Déductions :** Défaite d'Arthur à Camlann. \"Se tourner vers le ciel\" (D9/D8 ?)."],
        ),
        leaf(
            "enigme11_text",
            "Enigme 11 : Omnia vincit amor",
            &["Rome et Amour. Nomme-les."],
        ),
        leaf(
            "enigme12_text",
            "Enigme 12 : Consummatum est",
            &["La Table Ronde n'est plus. Il est temps de suivre l'angle du dernier chevalier."],
        ),
        Node::new("enigme13_text", "Enigme 13 : Ad vitam eternam").with_details([
            text("**Déductions :** \"Dix stades romains séparaient les troisième et onzième\" (1.85 km)."),
            text("**Image du tracé supposé en Brocéliande :** "),
            img(
                "https://i.imgur.com/HFnkrCU.jpeg",
                "Image of Tracé du chemin de la dernière énigme",
            ),
            text("Tout commence et tout s'achève. J'entends le chant retentir."),
        ]),
    ]
}

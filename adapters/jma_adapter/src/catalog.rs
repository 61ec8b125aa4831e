/// A forecast office area the viewer offers for selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefecture {
    pub name: &'static str,
    pub code: &'static str,
}

pub const PREFECTURES: &[Prefecture] = &[
    Prefecture { name: "北海道", code: "016000" },
    Prefecture { name: "青森", code: "020000" },
    Prefecture { name: "岩手", code: "030000" },
    Prefecture { name: "宮城", code: "040000" },
    Prefecture { name: "秋田", code: "050000" },
    Prefecture { name: "山形", code: "060000" },
    Prefecture { name: "福島", code: "070000" },
    Prefecture { name: "茨城", code: "080000" },
    Prefecture { name: "栃木", code: "090000" },
    Prefecture { name: "群馬", code: "100000" },
    Prefecture { name: "埼玉", code: "110000" },
    Prefecture { name: "千葉", code: "120000" },
    Prefecture { name: "東京", code: "130000" },
    Prefecture { name: "神奈川", code: "140000" },
    Prefecture { name: "新潟", code: "150000" },
    Prefecture { name: "富山", code: "160000" },
    Prefecture { name: "石川", code: "170000" },
    Prefecture { name: "福井", code: "180000" },
    Prefecture { name: "山梨", code: "190000" },
    Prefecture { name: "長野", code: "200000" },
    Prefecture { name: "岐阜", code: "210000" },
    Prefecture { name: "静岡", code: "220000" },
    Prefecture { name: "愛知", code: "230000" },
    Prefecture { name: "三重", code: "240000" },
    Prefecture { name: "滋賀", code: "250000" },
    Prefecture { name: "京都", code: "260000" },
    Prefecture { name: "大阪", code: "270000" },
    Prefecture { name: "兵庫", code: "280000" },
    Prefecture { name: "奈良", code: "290000" },
    Prefecture { name: "和歌山", code: "300000" },
    Prefecture { name: "鳥取", code: "310000" },
    Prefecture { name: "島根", code: "320000" },
    Prefecture { name: "岡山", code: "330000" },
    Prefecture { name: "広島", code: "340000" },
    Prefecture { name: "山口", code: "350000" },
    Prefecture { name: "徳島", code: "360000" },
    Prefecture { name: "香川", code: "370000" },
    Prefecture { name: "愛媛", code: "380000" },
    Prefecture { name: "高知", code: "390000" },
    Prefecture { name: "福岡", code: "400000" },
    Prefecture { name: "佐賀", code: "410000" },
    Prefecture { name: "長崎", code: "420000" },
    Prefecture { name: "熊本", code: "430000" },
    Prefecture { name: "大分", code: "440000" },
    Prefecture { name: "宮崎", code: "450000" },
    Prefecture { name: "鹿児島", code: "460100" },
    Prefecture { name: "沖縄", code: "471000" },
];

pub fn find_prefecture(code: &str) -> Option<&'static Prefecture> {
    PREFECTURES.iter().find(|p| p.code == code)
}

use crate::events::KeyInput;
use evdev::KeyCode;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Клавиши, которыми набирается код: буквы и цифры (классы вроде "1password")
static CODE_TO_CHAR: Lazy<HashMap<u16, char>> = Lazy::new(|| {
    let letters = [
        (KeyCode::KEY_A, 'a'), (KeyCode::KEY_B, 'b'), (KeyCode::KEY_C, 'c'),
        (KeyCode::KEY_D, 'd'), (KeyCode::KEY_E, 'e'), (KeyCode::KEY_F, 'f'),
        (KeyCode::KEY_G, 'g'), (KeyCode::KEY_H, 'h'), (KeyCode::KEY_I, 'i'),
        (KeyCode::KEY_J, 'j'), (KeyCode::KEY_K, 'k'), (KeyCode::KEY_L, 'l'),
        (KeyCode::KEY_M, 'm'), (KeyCode::KEY_N, 'n'), (KeyCode::KEY_O, 'o'),
        (KeyCode::KEY_P, 'p'), (KeyCode::KEY_Q, 'q'), (KeyCode::KEY_R, 'r'),
        (KeyCode::KEY_S, 's'), (KeyCode::KEY_T, 't'), (KeyCode::KEY_U, 'u'),
        (KeyCode::KEY_V, 'v'), (KeyCode::KEY_W, 'w'), (KeyCode::KEY_X, 'x'),
        (KeyCode::KEY_Y, 'y'), (KeyCode::KEY_Z, 'z'),
    ];
    let digits = [
        (KeyCode::KEY_1, '1'), (KeyCode::KEY_2, '2'), (KeyCode::KEY_3, '3'),
        (KeyCode::KEY_4, '4'), (KeyCode::KEY_5, '5'), (KeyCode::KEY_6, '6'),
        (KeyCode::KEY_7, '7'), (KeyCode::KEY_8, '8'), (KeyCode::KEY_9, '9'),
        (KeyCode::KEY_0, '0'),
    ];

    letters
        .into_iter()
        .chain(digits)
        .map(|(key, c)| (key.code(), c))
        .collect()
});

/// Перевод evdev KeyCode в нажатие переключателя
pub struct KeyMapper;

impl KeyMapper {
    pub fn translate(key: KeyCode) -> Option<KeyInput> {
        if key == KeyCode::KEY_ESC {
            return Some(KeyInput::Escape);
        }
        CODE_TO_CHAR.get(&key.code()).copied().map(KeyInput::Char)
    }
}
